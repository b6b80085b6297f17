use std::collections::HashMap;

use eframe::egui::{self, Rect, Response, Ui, Vec2};

use super::ViewModel;
use super::geometry::NodeFootprint;
use super::layout::LayoutFrame;
use super::propagation::{DragWave, collect_drag_updates};

/// Gesture bookkeeping. A canvas pan (secondary/middle button) and a node
/// drag (primary button) are mutually exclusive per pointer lifecycle; every
/// release-style event funnels through [`GestureState::release`], which is
/// idempotent, so gesture state can never get stuck.
///
/// There is no click-after-drag suppression flag here: egui never reports
/// `clicked_by` for a pointer lifecycle that became a decided drag, so a
/// drag-release can never arrive as a tap.
#[derive(Default)]
pub(in crate::app) struct GestureState {
    pub pan_active: bool,
    pub node_drag: Option<NodeDrag>,
}

pub(in crate::app) struct NodeDrag {
    pub node_id: String,
}

impl GestureState {
    pub fn any_active(&self) -> bool {
        self.pan_active || self.node_drag.is_some()
    }

    pub fn release(&mut self) {
        self.pan_active = false;
        self.node_drag = None;
    }
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let anchor = pointer - rect.left_top();
        let direction = if scroll > 0.0 { 1 } else { -1 };
        self.store.zoom_around_point(direction, anchor.x, anchor.y);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &Response) {
        let panning = response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle);
        if !panning {
            return;
        }

        self.scheduler.cancel_camera();
        self.gestures.pan_active = true;
        let delta = response.drag_delta();
        self.store.pan(delta.x, delta.y);
    }

    pub(in crate::app) fn handle_node_drag(
        &mut self,
        response: &Response,
        hovered: Option<&str>,
        rendered: &LayoutFrame,
        adjacency: &HashMap<String, Vec<String>>,
        footprints: &HashMap<String, NodeFootprint>,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(node_id) = hovered
        {
            self.scheduler.cancel_camera();
            self.gestures.node_drag = Some(NodeDrag {
                node_id: node_id.to_string(),
            });
        }

        if !response.dragged_by(egui::PointerButton::Primary) {
            return;
        }
        let Some(drag) = &self.gestures.node_drag else {
            return;
        };

        let delta_canvas = response.drag_delta();
        if delta_canvas == Vec2::ZERO {
            return;
        }

        let scale = self.store.viewport().scale;
        let delta_world = delta_canvas / scale;
        let node_id = drag.node_id.clone();
        let Some(current) = self
            .store
            .manual_positions()
            .get(&node_id)
            .copied()
            .or_else(|| {
                rendered
                    .nodes
                    .iter()
                    .find(|node| node.id == node_id)
                    .map(|node| node.pos)
            })
        else {
            return;
        };
        let next_position = current + delta_world;

        let mut base_positions = rendered
            .nodes
            .iter()
            .map(|node| {
                let base = self
                    .store
                    .manual_positions()
                    .get(&node.id)
                    .copied()
                    .unwrap_or(node.pos);
                (node.id.clone(), base)
            })
            .collect::<HashMap<_, _>>();
        base_positions.insert(node_id.clone(), next_position);

        let dragged_canvas_width = footprints
            .get(&node_id)
            .map(|footprint| footprint.half_width * 2.0 * scale)
            .unwrap_or(0.0);

        let mut batch = collect_drag_updates(
            &DragWave {
                dragged_id: &node_id,
                delta: delta_world,
                source_position: next_position,
                base_positions: &base_positions,
                adjacency,
                viewport_scale: scale,
                dragged_canvas_width,
            },
            &self.propagation,
        );
        batch.insert(node_id, next_position);
        self.store.set_manual_positions_batch(batch);
    }

    pub(in crate::app) fn handle_gesture_release(&mut self, ui: &Ui) {
        let (released, pointer_present) = ui.input(|input| {
            (
                input.pointer.any_released(),
                input.pointer.has_pointer(),
            )
        });
        if released || !pointer_present {
            self.gestures.release();
        }
    }

    pub(in crate::app) fn handle_node_click(&mut self, response: &Response, hovered: Option<&str>) {
        if response.double_clicked_by(egui::PointerButton::Primary) {
            self.expand_and_focus(hovered);
            return;
        }
        if response.clicked_by(egui::PointerButton::Primary) {
            self.select(hovered);
        }
    }

    fn expand_and_focus(&mut self, hovered: Option<&str>) {
        if let Some(node_id) = hovered {
            self.store.set_node_expanded(node_id, true);
            self.store.set_focused_node(Some(node_id.to_string()));
        }
    }

    fn select(&mut self, hovered: Option<&str>) {
        self.store.set_selected_node(hovered.map(str::to_string));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::prefs::Preferences;
    use crate::project::mock_project;

    fn model() -> ViewModel {
        ViewModel::new(mock_project(), Preferences::default(), true)
    }

    #[test]
    fn release_is_idempotent() {
        let mut gestures = GestureState {
            pan_active: true,
            node_drag: Some(NodeDrag {
                node_id: "a".to_string(),
            }),
        };

        gestures.release();
        assert!(!gestures.any_active());

        gestures.release();
        assert!(!gestures.any_active());
    }

    #[test]
    fn tap_after_a_drag_release_still_selects() {
        let mut model = model();
        model.gestures.node_drag = Some(NodeDrag {
            node_id: "file:main".to_string(),
        });
        model.gestures.release();

        // the next tap on the same node must go through
        model.select(Some("file:main"));
        assert_eq!(model.store.selected_node_id(), Some("file:main"));
    }

    #[test]
    fn background_tap_deselects() {
        let mut model = model();
        model.select(Some("file:main"));
        model.select(None);
        assert_eq!(model.store.selected_node_id(), None);
        assert_eq!(model.store.last_visited_node_id(), Some("file:main"));
    }

    #[test]
    fn double_click_expands_and_focuses() {
        let mut model = model();
        model.expand_and_focus(Some("file:parser"));
        assert!(model.store.expanded().contains("file:parser"));
        assert_eq!(model.store.focused_node_id(), Some("file:parser"));
    }
}
