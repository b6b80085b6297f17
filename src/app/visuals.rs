use eframe::egui::{Color32, Pos2, Rect, Vec2, vec2};

use crate::project::{NodeKind, SemanticType};

use super::store::Viewport;

pub const DEPTH_SCALE_STEP: f32 = 0.09;
pub const DEPTH_SCALE_MIN: f32 = 0.58;
pub const DEPTH_OPACITY_STEP: f32 = 0.13;
pub const DEPTH_OPACITY_MIN: f32 = 0.42;

#[derive(Clone, Copy, Debug)]
pub struct DepthVisual {
    pub scale: f32,
    pub opacity: f32,
}

/// Visual weight of a node at the given hop distance from the focus.
pub fn depth_visual(depth: u32) -> DepthVisual {
    let depth = depth as f32;
    DepthVisual {
        scale: (1.0 - depth * DEPTH_SCALE_STEP).max(DEPTH_SCALE_MIN),
        opacity: (1.0 - depth * DEPTH_OPACITY_STEP).max(DEPTH_OPACITY_MIN),
    }
}

/// Base card size in world units, before depth scaling.
pub fn node_base_size(kind: NodeKind) -> Vec2 {
    match kind {
        NodeKind::Project => vec2(172.0, 64.0),
        NodeKind::File => vec2(148.0, 54.0),
        NodeKind::Symbol => vec2(118.0, 44.0),
    }
}

pub fn world_to_canvas(rect: Rect, viewport: Viewport, world: Vec2) -> Pos2 {
    rect.left_top() + vec2(viewport.x, viewport.y) + world * viewport.scale
}

pub fn canvas_to_world(rect: Rect, viewport: Viewport, canvas: Pos2) -> Vec2 {
    (canvas - rect.left_top() - vec2(viewport.x, viewport.y)) / viewport.scale
}

pub fn semantic_accent(semantic_type: Option<SemanticType>) -> Color32 {
    match semantic_type {
        Some(SemanticType::Function) => Color32::from_rgb(104, 186, 255),
        Some(SemanticType::Class) => Color32::from_rgb(192, 132, 255),
        Some(SemanticType::Import) => Color32::from_rgb(110, 214, 166),
        Some(SemanticType::Export) => Color32::from_rgb(244, 190, 102),
        Some(SemanticType::Variable) => Color32::from_rgb(236, 142, 142),
        Some(SemanticType::File) => Color32::from_rgb(148, 164, 188),
        None => Color32::from_rgb(206, 210, 220),
    }
}

pub fn node_fill(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Project => Color32::from_rgb(42, 50, 64),
        NodeKind::File => Color32::from_rgb(35, 42, 54),
        NodeKind::Symbol => Color32::from_rgb(30, 35, 45),
    }
}

pub fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

pub fn draw_background(painter: &eframe::egui::Painter, rect: Rect, viewport: Viewport) {
    use eframe::egui::Stroke;

    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * viewport.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.left_top() + vec2(viewport.x, viewport.y);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}
