use std::collections::{HashMap, HashSet, VecDeque};
use std::f32::consts::{PI, TAU};

use eframe::egui::{Vec2, vec2};

use crate::project::{GraphEdge, GraphNode, NodeKind, SemanticType};

pub const TIER_RADIUS_BASE: f32 = 300.0;
pub const TIER_RADIUS_SHRINK: f32 = 0.8;
pub const TIER_RADIUS_MIN: f32 = 130.0;
pub const CHILD_FAN_SPREAD: f32 = PI * 0.9;

#[derive(Clone, Debug)]
pub struct PositionedNode {
    pub id: String,
    pub kind: NodeKind,
    pub semantic_type: Option<SemanticType>,
    pub label: String,
    pub pos: Vec2,
    pub depth: u32,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct FrameEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: Option<String>,
}

/// The rendered snapshot: BFS-ordered positioned nodes plus every edge whose
/// endpoints both made it into the frame.
#[derive(Clone, Debug, Default)]
pub struct LayoutFrame {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<FrameEdge>,
}

impl LayoutFrame {
    pub fn position_by_id(&self) -> HashMap<String, Vec2> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), node.pos))
            .collect()
    }

    pub fn depth_by_id(&self) -> HashMap<String, u32> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), node.depth))
            .collect()
    }
}

pub struct LayoutParams<'a> {
    pub root_id: &'a str,
    pub connection_depth: u32,
    pub nodes: &'a HashMap<String, GraphNode>,
    pub edges: &'a HashMap<String, GraphEdge>,
    pub child_ids_by_parent: &'a HashMap<String, Vec<String>>,
    pub sibling_page_by_parent: &'a HashMap<String, usize>,
    pub manual_positions: &'a HashMap<String, Vec2>,
    pub expanded: &'a HashSet<String>,
    pub max_visible_siblings: usize,
}

/// Slice of a parent's child list visible at the given page. The page index
/// clamps to the last page so a stale cursor can never select an empty slice.
pub fn visible_sibling_slice(children: &[String], page: usize, max: usize) -> &[String] {
    if children.is_empty() || max == 0 {
        return &[];
    }
    let page_count = children.len().div_ceil(max).max(1);
    let page = page.min(page_count - 1);
    let start = page * max;
    let end = (start + max).min(children.len());
    &children[start..end]
}

fn tier_radius(depth: u32) -> f32 {
    (TIER_RADIUS_BASE * TIER_RADIUS_SHRINK.powi(depth.saturating_sub(1) as i32))
        .max(TIER_RADIUS_MIN)
}

/// Deterministic tiered/radial placement: BFS from the root over child
/// adjacency, bounded by the connection depth unless a parent is explicitly
/// expanded. Children fan out around the direction their parent was placed
/// in; root children take the full circle. Manual positions override the
/// computed coordinates at the very end, never the tree anchoring.
pub fn compute_layout_frame(params: &LayoutParams<'_>) -> LayoutFrame {
    let mut frame = LayoutFrame::default();
    let Some(root) = params.nodes.get(params.root_id) else {
        return frame;
    };

    struct Placement {
        id: String,
        depth: u32,
        pos: Vec2,
        angle: f32,
    }

    let mut queue = VecDeque::from([Placement {
        id: root.id.clone(),
        depth: 0,
        pos: Vec2::ZERO,
        angle: 0.0,
    }]);
    let mut seen: HashSet<String> = HashSet::from([root.id.clone()]);
    let mut placed: Vec<Placement> = Vec::new();

    while let Some(current) = queue.pop_front() {
        let expand_children = current.depth < params.connection_depth
            || params.expanded.contains(&current.id);

        if expand_children
            && let Some(children) = params.child_ids_by_parent.get(&current.id)
        {
            let page = params
                .sibling_page_by_parent
                .get(&current.id)
                .copied()
                .unwrap_or(0);
            let visible = visible_sibling_slice(children, page, params.max_visible_siblings)
                .iter()
                .filter(|child_id| {
                    params.nodes.contains_key(*child_id) && !seen.contains(*child_id)
                })
                .cloned()
                .collect::<Vec<_>>();

            let count = visible.len();
            let child_depth = current.depth + 1;
            let radius = tier_radius(child_depth);

            for (index, child_id) in visible.into_iter().enumerate() {
                let angle = if current.depth == 0 {
                    TAU * index as f32 / count.max(1) as f32
                } else {
                    current.angle - CHILD_FAN_SPREAD / 2.0
                        + CHILD_FAN_SPREAD * (index as f32 + 0.5) / count.max(1) as f32
                };

                seen.insert(child_id.clone());
                queue.push_back(Placement {
                    id: child_id,
                    depth: child_depth,
                    pos: current.pos + vec2(angle.cos(), angle.sin()) * radius,
                    angle,
                });
            }
        }

        placed.push(current);
    }

    frame.nodes = placed
        .into_iter()
        .filter_map(|placement| {
            let node = params.nodes.get(&placement.id)?;
            let pos = params
                .manual_positions
                .get(&placement.id)
                .copied()
                .unwrap_or(placement.pos);
            Some(PositionedNode {
                id: node.id.clone(),
                kind: node.kind,
                semantic_type: node.semantic_type,
                label: node.label.clone(),
                pos,
                depth: placement.depth,
                loading: node.loading,
                error: node.error.clone(),
            })
        })
        .collect();

    let present = frame
        .nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<HashSet<_>>();

    let mut edge_ids = params
        .edges
        .values()
        .filter(|edge| present.contains(edge.source.as_str()) && present.contains(edge.target.as_str()))
        .map(|edge| edge.id.as_str())
        .collect::<Vec<_>>();
    edge_ids.sort_unstable();

    frame.edges = edge_ids
        .into_iter()
        .filter_map(|edge_id| params.edges.get(edge_id))
        .map(|edge| FrameEdge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            label: edge.label.clone(),
        })
        .collect();

    frame
}
