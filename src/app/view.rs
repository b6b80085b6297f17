use std::collections::{HashMap, HashSet};

use eframe::egui::{
    self, Align2, Color32, FontId, Rect, Sense, Stroke, StrokeKind, Ui, pos2, vec2,
};
use eframe::epaint::QuadraticBezierShape;

use crate::util::structured_label;

use super::ViewModel;
use super::annotate::{derive_adjacency, loop_bridge_nodes, selected_relatives};
use super::filter::filter_subgraph;
use super::geometry::{NodeFootprint, build_edge_geometry};
use super::layout::{LayoutFrame, LayoutParams, compute_layout_frame};
use super::store::MAX_VISIBLE_SIBLINGS;
use super::visuals::{
    blend_color, depth_visual, draw_background, node_base_size, node_fill, semantic_accent,
    with_opacity, world_to_canvas,
};

const SELECTED_STROKE: Color32 = Color32::from_rgb(245, 206, 93);
const VISITED_STROKE: Color32 = Color32::from_rgb(150, 140, 104);
const RELATIVE_STROKE: Color32 = Color32::from_rgb(241, 146, 94);
const LOOP_BRIDGE_STROKE: Color32 = Color32::from_rgb(236, 106, 180);

impl ViewModel {
    /// Rebuilds the target frame (filter -> layout) when anything feeding the
    /// layout changed, and hands it to the animation scheduler, which decides
    /// whether to tween or snap.
    pub(in crate::app) fn refresh_target_frame(&mut self, now: f64) {
        let revision = self.store.layout_revision();
        if !self.frame_dirty && self.last_layout_revision == Some(revision) {
            return;
        }
        self.frame_dirty = false;
        self.last_layout_revision = Some(revision);

        let Some(root_id) = self
            .store
            .focused_node_id()
            .or_else(|| self.store.root_node_id())
            .map(str::to_string)
        else {
            self.scheduler
                .retarget_layout(LayoutFrame::default(), false, now);
            return;
        };

        let filtered = filter_subgraph(
            self.store.nodes(),
            self.store.edges(),
            self.store.child_ids_by_parent(),
            self.store.manual_positions(),
            &self.type_filters,
        );

        let target = compute_layout_frame(&LayoutParams {
            root_id: &root_id,
            connection_depth: self.store.connection_depth(),
            nodes: &filtered.nodes,
            edges: &filtered.edges,
            child_ids_by_parent: &filtered.child_ids_by_parent,
            sibling_page_by_parent: self.store.sibling_page_by_parent(),
            manual_positions: &filtered.manual_positions,
            expanded: self.store.expanded(),
            max_visible_siblings: MAX_VISIBLE_SIBLINGS,
        });

        self.visible_node_count = target.nodes.len();
        self.visible_edge_count = target.edges.len();
        self.scheduler
            .retarget_layout(target, self.gestures.any_active(), now);
    }

    /// Starts a camera glide toward a newly focused node and advances the
    /// running glide. Gestures suppress the start; ticking writes the
    /// translation back through the viewport command.
    pub(in crate::app) fn update_camera(&mut self, rect: Rect, now: f64) {
        let focused = self.store.focused_node_id().map(str::to_string);
        if focused != self.last_focused_node_id {
            self.last_focused_node_id = focused.clone();

            if !self.gestures.any_active()
                && let Some(focus_id) = &focused
                && let Some(focus_pos) = self
                    .scheduler
                    .rendered()
                    .nodes
                    .iter()
                    .find(|node| &node.id == focus_id)
                    .map(|node| node.pos)
            {
                let viewport = self.store.viewport();
                let target = rect.size() / 2.0 - focus_pos * viewport.scale;
                self.scheduler.start_camera(
                    vec2(viewport.x, viewport.y),
                    target,
                    super::animation::AnimationScheduler::camera_focus_duration_secs(
                        self.motion_speed_factor,
                    ),
                    now,
                );
            }
        }

        if let Some(translation) = self.scheduler.tick_camera(now) {
            let scale = self.store.viewport().scale;
            self.store.set_viewport(translation.x, translation.y, scale);
        }
    }

    fn hovered_node_id(
        &self,
        ui: &Ui,
        rect: Rect,
        rendered: &LayoutFrame,
        footprints: &HashMap<String, NodeFootprint>,
    ) -> Option<String> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }
        let viewport = self.store.viewport();

        rendered
            .nodes
            .iter()
            .filter(|node| {
                let Some(footprint) = footprints.get(&node.id) else {
                    return false;
                };
                let center = world_to_canvas(rect, viewport, footprint.center);
                let half = vec2(footprint.half_width, footprint.half_height) * viewport.scale;
                Rect::from_center_size(center, half * 2.0).contains(pointer)
            })
            // shallower nodes draw on top, so they win the hit test
            .min_by_key(|node| node.depth)
            .map(|node| node.id.clone())
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let now = ui.ctx().input(|input| input.time);

        draw_background(&painter, rect, self.store.viewport());

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        self.refresh_target_frame(now);
        if self.scheduler.tick_layout(now) {
            // target frame changed positions again this tick
            ui.ctx().request_repaint();
        }
        self.update_camera(rect, now);
        if self.scheduler.is_camera_animating() {
            ui.ctx().request_repaint();
        }

        let rendered = self.scheduler.rendered().clone();
        if rendered.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No nodes match the current filters.",
                FontId::proportional(14.0),
                Color32::from_gray(180),
            );
            self.handle_gesture_release(ui);
            return;
        }

        let depth_by_id = rendered.depth_by_id();
        let adjacency = derive_adjacency(&rendered.edges);
        let loop_bridges = loop_bridge_nodes(&adjacency, &depth_by_id);
        let relatives = selected_relatives(&rendered.edges, self.store.selected_node_id());

        let footprints = rendered
            .nodes
            .iter()
            .map(|node| {
                let visual = depth_visual(node.depth);
                let size = node_base_size(node.kind) * visual.scale;
                (
                    node.id.clone(),
                    NodeFootprint {
                        center: node.pos,
                        half_width: size.x / 2.0,
                        half_height: size.y / 2.0,
                        depth: node.depth,
                    },
                )
            })
            .collect::<HashMap<_, _>>();

        let hovered = self.hovered_node_id(ui, rect, &rendered, &footprints);
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        self.handle_node_drag(
            &response,
            hovered.as_deref(),
            &rendered,
            &adjacency,
            &footprints,
        );

        self.paint_edges(&painter, rect, &rendered, &footprints, &relatives.edges);
        self.paint_nodes(
            &painter,
            rect,
            &rendered,
            hovered.as_deref(),
            &loop_bridges,
            &relatives.nodes,
        );

        self.handle_node_click(&response, hovered.as_deref());
        self.handle_gesture_release(ui);
    }

    fn paint_edges(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        rendered: &LayoutFrame,
        footprints: &HashMap<String, NodeFootprint>,
        relative_edges: &HashSet<String>,
    ) {
        let viewport = self.store.viewport();

        for edge in &rendered.edges {
            let Some(geometry) = build_edge_geometry(edge, footprints, relative_edges) else {
                continue;
            };

            let points = [
                world_to_canvas(rect, viewport, geometry.source_anchor),
                world_to_canvas(rect, viewport, geometry.control),
                world_to_canvas(rect, viewport, geometry.target_anchor),
            ];

            let (glow_opacity, glow_width) = if geometry.is_selected_relative {
                (geometry.opacity * 0.42, geometry.width + 2.6)
            } else {
                (geometry.opacity * 0.2, geometry.width + 1.7)
            };
            let (core_opacity, core_width) = if geometry.is_selected_relative {
                ((geometry.opacity + 0.2).min(1.0), geometry.width + 0.5)
            } else {
                (geometry.opacity * 0.78, geometry.width)
            };

            painter.add(QuadraticBezierShape::from_points_stroke(
                points,
                false,
                Color32::TRANSPARENT,
                Stroke::new(
                    (glow_width * viewport.scale).max(0.5),
                    with_opacity(geometry.glow, glow_opacity),
                ),
            ));
            painter.add(QuadraticBezierShape::from_points_stroke(
                points,
                false,
                Color32::TRANSPARENT,
                Stroke::new(
                    (core_width * viewport.scale).max(0.5),
                    with_opacity(geometry.stroke, core_opacity),
                ),
            ));

            if let Some(label) = &geometry.label {
                let label_pos = world_to_canvas(rect, viewport, geometry.label_pos);
                painter.text(
                    label_pos,
                    Align2::CENTER_CENTER,
                    label,
                    FontId::proportional((10.0 * viewport.scale).clamp(7.0, 14.0)),
                    with_opacity(Color32::from_gray(200), geometry.opacity),
                );
            }
        }
    }

    fn paint_nodes(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        rendered: &LayoutFrame,
        hovered: Option<&str>,
        loop_bridges: &HashSet<String>,
        relative_nodes: &HashSet<String>,
    ) {
        let viewport = self.store.viewport();
        let selected_id = self.store.selected_node_id();
        let visited_id = self.store.last_visited_node_id();
        let dragged_id = self
            .gestures
            .node_drag
            .as_ref()
            .map(|drag| drag.node_id.as_str());

        // deepest first so shallow nodes paint on top
        let mut draw_order = (0..rendered.nodes.len()).collect::<Vec<_>>();
        draw_order.sort_by(|a, b| rendered.nodes[*b].depth.cmp(&rendered.nodes[*a].depth));

        for index in draw_order {
            let node = &rendered.nodes[index];
            let visual = depth_visual(node.depth);
            let size = node_base_size(node.kind) * visual.scale * viewport.scale;
            let center = world_to_canvas(rect, viewport, node.pos);
            let node_rect = Rect::from_center_size(center, size);
            if !rect.intersects(node_rect) {
                continue;
            }

            let is_selected = selected_id == Some(node.id.as_str());
            let is_visited = visited_id == Some(node.id.as_str());
            let is_hovered = hovered == Some(node.id.as_str());
            let is_dragging = dragged_id == Some(node.id.as_str());
            let is_relative = relative_nodes.contains(&node.id);
            let is_loop_bridge = loop_bridges.contains(&node.id);

            let accent = semantic_accent(node.semantic_type);
            let mut fill = node_fill(node.kind);
            if is_selected {
                fill = blend_color(fill, SELECTED_STROKE, 0.22);
            } else if is_hovered || is_dragging {
                fill = blend_color(fill, accent, 0.18);
            } else if is_relative {
                fill = blend_color(fill, RELATIVE_STROKE, 0.12);
            }

            let rounding = 6.0 * viewport.scale.clamp(0.5, 1.5);
            painter.rect_filled(node_rect, rounding, with_opacity(fill, visual.opacity));

            let (stroke_color, stroke_width) = if is_selected {
                (SELECTED_STROKE, 2.0)
            } else if is_relative {
                (RELATIVE_STROKE, 1.6)
            } else if is_visited {
                (VISITED_STROKE, 1.4)
            } else {
                (Color32::from_rgba_unmultiplied(90, 100, 116, 200), 1.0)
            };
            painter.rect_stroke(
                node_rect,
                rounding,
                Stroke::new(stroke_width, with_opacity(stroke_color, visual.opacity)),
                StrokeKind::Inside,
            );

            if is_loop_bridge {
                painter.rect_stroke(
                    node_rect.expand(3.0),
                    rounding,
                    Stroke::new(1.2, with_opacity(LOOP_BRIDGE_STROKE, visual.opacity * 0.9)),
                    StrokeKind::Outside,
                );
            }

            // semantic accent dot on the left edge of the card
            painter.circle_filled(
                pos2(node_rect.left() + 9.0, node_rect.center().y),
                (3.2 * viewport.scale).clamp(1.6, 5.0),
                with_opacity(accent, visual.opacity),
            );

            self.paint_node_label(painter, node_rect, node, visual.opacity, viewport.scale);
        }
    }

    fn paint_node_label(
        &self,
        painter: &egui::Painter,
        node_rect: Rect,
        node: &super::layout::PositionedNode,
        opacity: f32,
        scale: f32,
    ) {
        let label = structured_label(&node.label, node.kind);
        let primary_font = FontId::proportional((12.0 * scale).clamp(8.0, 18.0));
        let small_font = FontId::proportional((9.5 * scale).clamp(7.0, 14.0));

        let mut primary = label.primary;
        if let Some(extension) = &label.extension {
            primary.push('.');
            primary.push_str(extension);
        }

        let has_secondary = label.secondary.is_some() || node.loading || node.error.is_some();
        let primary_pos = if has_secondary {
            node_rect.center() - vec2(0.0, node_rect.height() * 0.16)
        } else {
            node_rect.center()
        };
        painter.text(
            primary_pos,
            Align2::CENTER_CENTER,
            primary,
            primary_font,
            with_opacity(Color32::from_gray(235), opacity),
        );

        let secondary_pos = node_rect.center() + vec2(0.0, node_rect.height() * 0.22);
        if let Some(error) = &node.error {
            painter.text(
                secondary_pos,
                Align2::CENTER_CENTER,
                error,
                small_font,
                with_opacity(Color32::from_rgb(240, 120, 110), opacity),
            );
        } else if node.loading {
            painter.text(
                secondary_pos,
                Align2::CENTER_CENTER,
                "Loading…",
                small_font,
                with_opacity(Color32::from_gray(170), opacity),
            );
        } else if let Some(secondary) = &label.secondary {
            painter.text(
                secondary_pos,
                Align2::CENTER_CENTER,
                secondary,
                small_font,
                with_opacity(Color32::from_gray(175), opacity),
            );
        }
    }
}
