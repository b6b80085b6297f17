use std::collections::{HashMap, HashSet};

use eframe::egui::Vec2;

use crate::project::{GraphEdge, GraphNode, ProjectGraph};

pub const MIN_SCALE: f32 = 0.25;
pub const MAX_SCALE: f32 = 2.5;
pub const ZOOM_STEP: f32 = 1.12;
pub const MIN_CONNECTION_DEPTH: u32 = 1;
pub const MAX_CONNECTION_DEPTH: u32 = 6;
pub const MAX_VISIBLE_SIBLINGS: usize = 5;

/// Canvas transform: canvas point = world point * scale + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    Connected,
    Syncing,
    Error,
}

/// The owned graph state. Reads go through accessors; every mutation is a
/// named command. Commands that change what the layout builder would produce
/// bump `layout_revision` so the frame pipeline knows to rebuild.
pub struct GraphStore {
    project_id: String,
    root_node_id: Option<String>,
    focused_node_id: Option<String>,
    selected_node_id: Option<String>,
    last_visited_node_id: Option<String>,
    nodes: HashMap<String, GraphNode>,
    edges: HashMap<String, GraphEdge>,
    child_ids_by_parent: HashMap<String, Vec<String>>,
    sibling_page_by_parent: HashMap<String, usize>,
    manual_positions: HashMap<String, Vec2>,
    expanded: HashSet<String>,
    connection_depth: u32,
    viewport: Viewport,
    sync_status: SyncStatus,
    layout_revision: u64,
}

impl GraphStore {
    pub fn new(graph: ProjectGraph, connection_depth: u32) -> Self {
        let root = graph.root_id.clone();
        Self {
            project_id: graph.project_id,
            root_node_id: Some(root.clone()),
            focused_node_id: Some(root),
            selected_node_id: None,
            last_visited_node_id: None,
            nodes: graph.nodes,
            edges: graph.edges,
            child_ids_by_parent: graph.child_ids_by_parent,
            sibling_page_by_parent: HashMap::new(),
            manual_positions: HashMap::new(),
            expanded: HashSet::new(),
            connection_depth: connection_depth
                .clamp(MIN_CONNECTION_DEPTH, MAX_CONNECTION_DEPTH),
            viewport: Viewport::default(),
            sync_status: SyncStatus::Connected,
            layout_revision: 0,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn root_node_id(&self) -> Option<&str> {
        self.root_node_id.as_deref()
    }

    pub fn focused_node_id(&self) -> Option<&str> {
        self.focused_node_id.as_deref()
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node_id.as_deref()
    }

    pub fn last_visited_node_id(&self) -> Option<&str> {
        self.last_visited_node_id.as_deref()
    }

    pub fn nodes(&self) -> &HashMap<String, GraphNode> {
        &self.nodes
    }

    pub fn edges(&self) -> &HashMap<String, GraphEdge> {
        &self.edges
    }

    pub fn child_ids_by_parent(&self) -> &HashMap<String, Vec<String>> {
        &self.child_ids_by_parent
    }

    pub fn sibling_page_by_parent(&self) -> &HashMap<String, usize> {
        &self.sibling_page_by_parent
    }

    pub fn manual_positions(&self) -> &HashMap<String, Vec2> {
        &self.manual_positions
    }

    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    pub fn child_total(&self, parent_id: &str) -> usize {
        self.child_ids_by_parent
            .get(parent_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn connection_depth(&self) -> u32 {
        self.connection_depth
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    pub fn layout_revision(&self) -> u64 {
        self.layout_revision
    }

    fn mark_layout_changed(&mut self) {
        self.layout_revision = self.layout_revision.wrapping_add(1);
    }

    pub fn set_viewport(&mut self, x: f32, y: f32, scale: f32) {
        self.viewport = Viewport {
            x,
            y,
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
        };
    }

    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        self.viewport.x += delta_x;
        self.viewport.y += delta_y;
    }

    /// Zooms one step in (`direction > 0`) or out, keeping the world point
    /// under the anchor (canvas coordinates) fixed on screen.
    pub fn zoom_around_point(&mut self, direction: i32, anchor_x: f32, anchor_y: f32) {
        let factor = if direction > 0 {
            ZOOM_STEP
        } else {
            1.0 / ZOOM_STEP
        };
        let next_scale = (self.viewport.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (next_scale - self.viewport.scale).abs() <= f32::EPSILON {
            return;
        }

        let world_x = (anchor_x - self.viewport.x) / self.viewport.scale;
        let world_y = (anchor_y - self.viewport.y) / self.viewport.scale;
        self.viewport = Viewport {
            x: anchor_x - world_x * next_scale,
            y: anchor_y - world_y * next_scale,
            scale: next_scale,
        };
    }

    pub fn set_selected_node(&mut self, node_id: Option<String>) {
        if node_id == self.selected_node_id {
            return;
        }
        if let Some(previous) = self.selected_node_id.take() {
            self.last_visited_node_id = Some(previous);
        }
        self.selected_node_id = node_id.filter(|id| self.nodes.contains_key(id));
    }

    pub fn set_focused_node(&mut self, node_id: Option<String>) {
        let node_id = node_id.filter(|id| self.nodes.contains_key(id));
        if node_id != self.focused_node_id {
            self.focused_node_id = node_id;
            self.mark_layout_changed();
        }
    }

    pub fn set_node_expanded(&mut self, node_id: &str, expanded: bool) {
        if !self.nodes.contains_key(node_id) {
            return;
        }
        let changed = if expanded {
            self.expanded.insert(node_id.to_string())
        } else {
            self.expanded.remove(node_id)
        };
        if changed {
            self.mark_layout_changed();
        }
    }

    /// Applies a dragged node's move and its propagated neighbor nudges as
    /// one atomic batch.
    pub fn set_manual_positions_batch(&mut self, updates: HashMap<String, Vec2>) {
        let mut changed = false;
        for (node_id, position) in updates {
            if self.nodes.contains_key(&node_id) {
                self.manual_positions.insert(node_id, position);
                changed = true;
            }
        }
        if changed {
            self.mark_layout_changed();
        }
    }

    pub fn set_sibling_page(&mut self, parent_id: &str, page: usize) {
        let total = self.child_total(parent_id);
        if total == 0 {
            return;
        }
        let page_count = total.div_ceil(MAX_VISIBLE_SIBLINGS).max(1);
        let clamped = page.min(page_count - 1);
        let current = self
            .sibling_page_by_parent
            .get(parent_id)
            .copied()
            .unwrap_or(0);
        if clamped != current {
            self.sibling_page_by_parent
                .insert(parent_id.to_string(), clamped);
            self.mark_layout_changed();
        }
    }

    pub fn set_connection_depth(&mut self, depth: u32) {
        let clamped = depth.clamp(MIN_CONNECTION_DEPTH, MAX_CONNECTION_DEPTH);
        if clamped != self.connection_depth {
            self.connection_depth = clamped;
            self.mark_layout_changed();
        }
    }

    pub fn set_sync_status(&mut self, status: SyncStatus) {
        self.sync_status = status;
    }

    /// Replaces the graph data after a refresh. Selection, focus, expansion
    /// state, pagination and manual positions survive for ids that still
    /// exist; everything else is dropped.
    pub fn apply_project(&mut self, graph: ProjectGraph) {
        self.project_id = graph.project_id;
        self.nodes = graph.nodes;
        self.edges = graph.edges;
        self.child_ids_by_parent = graph.child_ids_by_parent;
        self.root_node_id = Some(graph.root_id.clone());

        self.selected_node_id = self
            .selected_node_id
            .take()
            .filter(|id| self.nodes.contains_key(id));
        self.last_visited_node_id = self
            .last_visited_node_id
            .take()
            .filter(|id| self.nodes.contains_key(id));
        self.focused_node_id = self
            .focused_node_id
            .take()
            .filter(|id| self.nodes.contains_key(id))
            .or(Some(graph.root_id));
        self.manual_positions
            .retain(|id, _| self.nodes.contains_key(id));
        self.expanded.retain(|id| self.nodes.contains_key(id));
        self.sibling_page_by_parent
            .retain(|id, _| self.nodes.contains_key(id));

        self.mark_layout_changed();
    }
}
