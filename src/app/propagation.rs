use std::collections::{HashMap, HashSet, VecDeque};

use eframe::egui::Vec2;

/// Tuning constants for the drag wave. These are policy, not law; callers
/// can override any of them.
#[derive(Clone, Copy, Debug)]
pub struct PropagationConfig {
    /// Influence of a neighbor at zero distance from the dragged node.
    pub base_influence: f32,
    /// Transmission multiplier applied per hop.
    pub hop_decay: f32,
    /// Damping applied to the final positional nudge.
    pub smoothing: f32,
    /// Influence below this moves nothing and stops the branch.
    pub min_influence: f32,
    /// Lower bound of the propagation radius in canvas pixels.
    pub min_radius_px: f32,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            base_influence: 0.95,
            hop_decay: 0.78,
            smoothing: 0.88,
            min_influence: 0.006,
            min_radius_px: 32.0,
        }
    }
}

pub struct DragWave<'a> {
    pub dragged_id: &'a str,
    /// World-space pointer delta of this drag step.
    pub delta: Vec2,
    /// The dragged node's new world position (applied separately by the caller).
    pub source_position: Vec2,
    /// Base position (manual override if present, else rendered) per frame node.
    pub base_positions: &'a HashMap<String, Vec2>,
    pub adjacency: &'a HashMap<String, Vec<String>>,
    pub viewport_scale: f32,
    /// The dragged node's on-canvas width at its depth-scaled render size.
    pub dragged_canvas_width: f32,
}

/// Bounded breadth-first drag wave with dual decay: quadratic spatial
/// falloff inside a canvas-pixel radius and a per-hop transmission decay.
/// Returns new world positions for affected neighbors only; the dragged
/// node itself is never part of the result. Pure, each node visited at most
/// once even through cycles.
pub fn collect_drag_updates(
    wave: &DragWave<'_>,
    config: &PropagationConfig,
) -> HashMap<String, Vec2> {
    let radius_px = config
        .min_radius_px
        .max(wave.dragged_canvas_width * 2.0);

    let mut updates = HashMap::new();
    let mut queue = VecDeque::from([(wave.dragged_id.to_string(), 1.0_f32)]);
    let mut visited: HashSet<String> = HashSet::from([wave.dragged_id.to_string()]);

    while let Some((current_id, transmission)) = queue.pop_front() {
        let Some(neighbors) = wave.adjacency.get(&current_id) else {
            continue;
        };

        for neighbor_id in neighbors {
            if !visited.insert(neighbor_id.clone()) {
                continue;
            }

            let Some(&base_position) = wave.base_positions.get(neighbor_id) else {
                continue;
            };

            let world_distance = (base_position - wave.source_position).length();
            let canvas_distance = world_distance * wave.viewport_scale;
            if canvas_distance > radius_px {
                continue;
            }

            let normalized_distance = (canvas_distance / radius_px).clamp(0.0, 1.0);
            let falloff = (1.0 - normalized_distance).powi(2);
            let influence = config.base_influence * falloff * transmission;
            if influence < config.min_influence {
                continue;
            }

            let nudge = wave.delta * influence * config.smoothing;
            updates.insert(neighbor_id.clone(), base_position + nudge);
            queue.push_back((neighbor_id.clone(), transmission * config.hop_decay));
        }
    }

    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    fn adjacency(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
        for (a, b) in pairs {
            adjacency
                .entry(a.to_string())
                .or_default()
                .push(b.to_string());
            adjacency
                .entry(b.to_string())
                .or_default()
                .push(a.to_string());
        }
        adjacency
    }

    fn wave<'a>(
        base_positions: &'a HashMap<String, Vec2>,
        adjacency: &'a HashMap<String, Vec<String>>,
        delta: Vec2,
        source_position: Vec2,
    ) -> DragWave<'a> {
        DragWave {
            dragged_id: "a",
            delta,
            source_position,
            base_positions,
            adjacency,
            viewport_scale: 1.0,
            dragged_canvas_width: 32.0,
        }
    }

    #[test]
    fn matches_the_worked_example() {
        // radius = max(32, 32 * 2) = 64 canvas px; neighbor at 20 px.
        let base = HashMap::from([
            ("a".to_string(), Vec2::ZERO),
            ("b".to_string(), vec2(20.0, 0.0)),
        ]);
        let adjacency = adjacency(&[("a", "b")]);
        let updates = collect_drag_updates(
            &wave(&base, &adjacency, vec2(40.0, 0.0), Vec2::ZERO),
            &PropagationConfig::default(),
        );

        let moved = updates["b"];
        let expected = 40.0 * 0.95 * (1.0_f32 - 20.0 / 64.0).powi(2) * 0.88;
        assert!((moved.x - (20.0 + expected)).abs() < 1e-3, "moved {moved:?}");
        assert!(moved.y.abs() < 1e-6);
        assert!(expected > 15.0 && expected < 40.0, "damped, not the full delta");
    }

    #[test]
    fn never_returns_the_dragged_node() {
        let base = HashMap::from([
            ("a".to_string(), Vec2::ZERO),
            ("b".to_string(), vec2(10.0, 0.0)),
        ]);
        let adjacency = adjacency(&[("a", "b")]);
        let updates = collect_drag_updates(
            &wave(&base, &adjacency, vec2(5.0, 0.0), Vec2::ZERO),
            &PropagationConfig::default(),
        );
        assert!(!updates.contains_key("a"));
        assert!(updates.contains_key("b"));
    }

    #[test]
    fn cycles_are_visited_once() {
        let base = HashMap::from([
            ("a".to_string(), Vec2::ZERO),
            ("b".to_string(), vec2(8.0, 0.0)),
            ("c".to_string(), vec2(0.0, 8.0)),
        ]);
        let adjacency = adjacency(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let updates = collect_drag_updates(
            &wave(&base, &adjacency, vec2(10.0, 0.0), Vec2::ZERO),
            &PropagationConfig::default(),
        );
        // both neighbors moved exactly once, no double-application via the cycle
        assert_eq!(updates.len(), 2);
    }

    #[test]
    fn influence_decreases_with_distance() {
        let base = HashMap::from([
            ("a".to_string(), Vec2::ZERO),
            ("b".to_string(), vec2(5.0, 0.0)),
            ("c".to_string(), vec2(40.0, 0.0)),
        ]);
        let adjacency = adjacency(&[("a", "b"), ("a", "c")]);
        let updates = collect_drag_updates(
            &wave(&base, &adjacency, vec2(10.0, 0.0), Vec2::ZERO),
            &PropagationConfig::default(),
        );

        let near_move = updates["b"].x - 5.0;
        let far_move = updates["c"].x - 40.0;
        assert!(near_move > far_move, "near {near_move} far {far_move}");
    }

    #[test]
    fn neighbors_beyond_the_radius_are_absent_and_prune_the_branch() {
        let base = HashMap::from([
            ("a".to_string(), Vec2::ZERO),
            ("b".to_string(), vec2(100.0, 0.0)),
            ("c".to_string(), vec2(4.0, 0.0)),
        ]);
        // c is close to the drag source but only reachable through b
        let adjacency = adjacency(&[("a", "b"), ("b", "c")]);
        let updates = collect_drag_updates(
            &wave(&base, &adjacency, vec2(10.0, 0.0), Vec2::ZERO),
            &PropagationConfig::default(),
        );

        assert!(!updates.contains_key("b"), "beyond the 64 px radius");
        assert!(
            !updates.contains_key("c"),
            "the wave cannot jump past an out-of-range node"
        );
    }

    #[test]
    fn boundary_neighbor_gets_negligible_influence() {
        let base = HashMap::from([
            ("a".to_string(), Vec2::ZERO),
            ("b".to_string(), vec2(64.0, 0.0)),
        ]);
        let adjacency = adjacency(&[("a", "b")]);
        let updates = collect_drag_updates(
            &wave(&base, &adjacency, vec2(40.0, 0.0), Vec2::ZERO),
            &PropagationConfig::default(),
        );
        // influence at the exact radius is 0, below the negligibility floor
        assert!(!updates.contains_key("b"));
    }

    #[test]
    fn hop_decay_weakens_the_wave_along_chains() {
        // b and c sit at the same distance from the source, but c is one hop
        // further away in the graph.
        let base = HashMap::from([
            ("a".to_string(), Vec2::ZERO),
            ("b".to_string(), vec2(12.0, 0.0)),
            ("c".to_string(), vec2(0.0, 12.0)),
        ]);
        let adjacency = adjacency(&[("a", "b"), ("b", "c")]);
        let updates = collect_drag_updates(
            &wave(&base, &adjacency, vec2(10.0, 0.0), Vec2::ZERO),
            &PropagationConfig::default(),
        );

        let one_hop = updates["b"].x - 12.0;
        let two_hops = updates["c"].x;
        assert!(one_hop > two_hops, "one hop {one_hop} two hops {two_hops}");
        let ratio = two_hops / one_hop;
        assert!((ratio - 0.78).abs() < 1e-3, "hop decay ratio {ratio}");
    }

    #[test]
    fn scale_shrinks_the_world_radius() {
        let base = HashMap::from([
            ("a".to_string(), Vec2::ZERO),
            ("b".to_string(), vec2(40.0, 0.0)),
        ]);
        let adjacency = adjacency(&[("a", "b")]);

        let mut close_zoom = wave(&base, &adjacency, vec2(10.0, 0.0), Vec2::ZERO);
        close_zoom.viewport_scale = 2.0;
        let zoomed_in = collect_drag_updates(&close_zoom, &PropagationConfig::default());
        assert!(!zoomed_in.contains_key("b"), "80 canvas px > 64 px radius");

        let at_unit = collect_drag_updates(
            &wave(&base, &adjacency, vec2(10.0, 0.0), Vec2::ZERO),
            &PropagationConfig::default(),
        );
        assert!(at_unit.contains_key("b"));
    }
}
