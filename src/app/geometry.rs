use std::collections::{HashMap, HashSet};

use eframe::egui::{Color32, Vec2, vec2};

use super::layout::FrameEdge;

pub const EDGE_MIN_OPACITY: f32 = 0.18;
pub const EDGE_OPACITY_STEP: f32 = 0.16;
pub const EDGE_BASE_WIDTH: f32 = 2.2;
pub const EDGE_WIDTH_DEPTH_DROP: f32 = 0.28;
pub const EDGE_MIN_WIDTH: f32 = 0.95;
/// Perpendicular control-point offset as a fraction of chord length.
pub const EDGE_CURVE_BEND: f32 = 0.12;
pub const EDGE_CURVE_BEND_MAX: f32 = 26.0;

const EDGE_DEPTH_PALETTE: [(Color32, Color32); 5] = [
    (
        Color32::from_rgb(150, 170, 196),
        Color32::from_rgb(96, 150, 210),
    ),
    (
        Color32::from_rgb(128, 146, 170),
        Color32::from_rgb(84, 128, 182),
    ),
    (
        Color32::from_rgb(108, 124, 146),
        Color32::from_rgb(74, 108, 156),
    ),
    (
        Color32::from_rgb(92, 106, 126),
        Color32::from_rgb(64, 92, 132),
    ),
    (
        Color32::from_rgb(78, 90, 108),
        Color32::from_rgb(56, 78, 112),
    ),
];

/// One node's footprint as the edge builder sees it: world center plus the
/// depth-scaled half extents of its card.
#[derive(Clone, Copy, Debug)]
pub struct NodeFootprint {
    pub center: Vec2,
    pub half_width: f32,
    pub half_height: f32,
    pub depth: u32,
}

/// Fully derived per-frame geometry and styling for one edge, in world units.
#[derive(Clone, Debug)]
pub struct EdgeGeometry {
    pub id: String,
    pub label: Option<String>,
    pub source_anchor: Vec2,
    pub control: Vec2,
    pub target_anchor: Vec2,
    pub label_pos: Vec2,
    pub opacity: f32,
    pub width: f32,
    pub stroke: Color32,
    pub glow: Color32,
    pub is_selected_relative: bool,
}

/// Point where the straight line from `center` toward `toward` crosses the
/// node's rectangular boundary, so edges terminate at card borders instead
/// of centers. Falls back to the center for coincident nodes.
pub fn perimeter_anchor(center: Vec2, toward: Vec2, half_width: f32, half_height: f32) -> Vec2 {
    let delta = toward - center;
    if delta.x.abs() <= f32::EPSILON && delta.y.abs() <= f32::EPSILON {
        return center;
    }

    let scale_x = if delta.x.abs() > f32::EPSILON {
        half_width / delta.x.abs()
    } else {
        f32::INFINITY
    };
    let scale_y = if delta.y.abs() > f32::EPSILON {
        half_height / delta.y.abs()
    } else {
        f32::INFINITY
    };

    center + delta * scale_x.min(scale_y).min(1.0)
}

/// Control point for the organic curve: the chord midpoint pushed
/// perpendicular by an amount scaling with chord length, so near-parallel
/// edges separate visually.
pub fn organic_control_point(from: Vec2, to: Vec2) -> Vec2 {
    let chord = to - from;
    let length = chord.length();
    if length <= f32::EPSILON {
        return from;
    }

    let perpendicular = vec2(-chord.y, chord.x) / length;
    let bend = (length * EDGE_CURVE_BEND).min(EDGE_CURVE_BEND_MAX);
    from + chord * 0.5 + perpendicular * bend
}

/// Quadratic curve midpoint (t = 0.5), where the edge label anchors.
fn curve_midpoint(from: Vec2, control: Vec2, to: Vec2) -> Vec2 {
    from * 0.25 + control * 0.5 + to * 0.25
}

pub fn edge_depth_color(depth: u32) -> (Color32, Color32) {
    EDGE_DEPTH_PALETTE[(depth as usize).min(EDGE_DEPTH_PALETTE.len() - 1)]
}

/// Derives anchors, curve and depth styling for one edge from the current
/// node footprints. Returns None when either endpoint is missing from the
/// frame; malformed input never fails, it just renders less.
pub fn build_edge_geometry(
    edge: &FrameEdge,
    footprints: &HashMap<String, NodeFootprint>,
    relative_edges: &HashSet<String>,
) -> Option<EdgeGeometry> {
    let source = footprints.get(&edge.source)?;
    let target = footprints.get(&edge.target)?;

    let source_anchor = perimeter_anchor(
        source.center,
        target.center,
        source.half_width,
        source.half_height,
    );
    let target_anchor = perimeter_anchor(
        target.center,
        source.center,
        target.half_width,
        target.half_height,
    );
    let control = organic_control_point(source_anchor, target_anchor);

    let edge_depth = source.depth.max(target.depth);
    let opacity = (1.0 - edge_depth as f32 * EDGE_OPACITY_STEP).max(EDGE_MIN_OPACITY);
    let width = (EDGE_BASE_WIDTH - edge_depth as f32 * EDGE_WIDTH_DEPTH_DROP).max(EDGE_MIN_WIDTH);
    let (stroke, glow) = edge_depth_color(edge_depth);

    Some(EdgeGeometry {
        id: edge.id.clone(),
        label: edge.label.clone(),
        source_anchor,
        control,
        target_anchor,
        label_pos: curve_midpoint(source_anchor, control, target_anchor),
        opacity,
        width,
        stroke,
        glow,
        is_selected_relative: relative_edges.contains(&edge.id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footprint(x: f32, y: f32, half_width: f32, half_height: f32, depth: u32) -> NodeFootprint {
        NodeFootprint {
            center: vec2(x, y),
            half_width,
            half_height,
            depth,
        }
    }

    fn edge(id: &str, source: &str, target: &str) -> FrameEdge {
        FrameEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            label: None,
        }
    }

    #[test]
    fn anchor_lands_on_the_facing_side() {
        // target is straight to the right: anchor on the right edge
        let anchor = perimeter_anchor(vec2(0.0, 0.0), vec2(200.0, 0.0), 50.0, 20.0);
        assert!((anchor.x - 50.0).abs() < 1e-4);
        assert!(anchor.y.abs() < 1e-4);

        // target above: anchor on the top edge
        let anchor = perimeter_anchor(vec2(0.0, 0.0), vec2(0.0, -200.0), 50.0, 20.0);
        assert!(anchor.x.abs() < 1e-4);
        assert!((anchor.y + 20.0).abs() < 1e-4);

        // diagonal shallow enough to exit through the vertical side
        let anchor = perimeter_anchor(vec2(0.0, 0.0), vec2(200.0, 40.0), 50.0, 20.0);
        assert!((anchor.x - 50.0).abs() < 1e-4);
        assert!((anchor.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn anchor_never_overshoots_a_very_close_node() {
        let anchor = perimeter_anchor(vec2(0.0, 0.0), vec2(10.0, 0.0), 50.0, 20.0);
        assert!((anchor.x - 10.0).abs() < 1e-4, "clamped to the other center");
    }

    #[test]
    fn control_point_bends_perpendicular_to_the_chord() {
        let from = vec2(0.0, 0.0);
        let to = vec2(100.0, 0.0);
        let control = organic_control_point(from, to);
        assert!((control.x - 50.0).abs() < 1e-4);
        let expected_bend = (100.0 * EDGE_CURVE_BEND).min(EDGE_CURVE_BEND_MAX);
        assert!((control.y.abs() - expected_bend).abs() < 1e-4);
    }

    #[test]
    fn depth_styling_fades_with_the_deeper_endpoint() {
        let footprints = HashMap::from([
            ("a".to_string(), footprint(0.0, 0.0, 50.0, 20.0, 1)),
            ("b".to_string(), footprint(300.0, 0.0, 50.0, 20.0, 3)),
        ]);
        let geometry =
            build_edge_geometry(&edge("e1", "a", "b"), &footprints, &HashSet::new()).unwrap();

        assert!((geometry.opacity - (1.0 - 3.0 * EDGE_OPACITY_STEP)).abs() < 1e-4);
        assert!((geometry.width - (EDGE_BASE_WIDTH - 3.0 * EDGE_WIDTH_DEPTH_DROP)).abs() < 1e-4);

        let deep = HashMap::from([
            ("a".to_string(), footprint(0.0, 0.0, 50.0, 20.0, 30)),
            ("b".to_string(), footprint(300.0, 0.0, 50.0, 20.0, 30)),
        ]);
        let faded = build_edge_geometry(&edge("e1", "a", "b"), &deep, &HashSet::new()).unwrap();
        assert_eq!(faded.opacity, EDGE_MIN_OPACITY);
        assert_eq!(faded.width, EDGE_MIN_WIDTH);
    }

    #[test]
    fn label_anchors_at_the_curve_midpoint() {
        let footprints = HashMap::from([
            ("a".to_string(), footprint(0.0, 0.0, 10.0, 10.0, 0)),
            ("b".to_string(), footprint(100.0, 0.0, 10.0, 10.0, 1)),
        ]);
        let geometry =
            build_edge_geometry(&edge("e1", "a", "b"), &footprints, &HashSet::new()).unwrap();

        let expected = geometry.source_anchor * 0.25
            + geometry.control * 0.5
            + geometry.target_anchor * 0.25;
        assert!((geometry.label_pos - expected).length() < 1e-4);
    }

    #[test]
    fn missing_endpoints_are_skipped() {
        let footprints = HashMap::from([("a".to_string(), footprint(0.0, 0.0, 10.0, 10.0, 0))]);
        assert!(build_edge_geometry(&edge("e1", "a", "ghost"), &footprints, &HashSet::new()).is_none());
    }

    #[test]
    fn relative_flag_follows_the_selection_set() {
        let footprints = HashMap::from([
            ("a".to_string(), footprint(0.0, 0.0, 10.0, 10.0, 0)),
            ("b".to_string(), footprint(100.0, 0.0, 10.0, 10.0, 1)),
        ]);
        let relatives = HashSet::from(["e1".to_string()]);
        let geometry = build_edge_geometry(&edge("e1", "a", "b"), &footprints, &relatives).unwrap();
        assert!(geometry.is_selected_relative);
    }
}
