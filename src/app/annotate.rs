use std::collections::{HashMap, HashSet};

use super::layout::FrameEdge;

/// Undirected neighbor list over the frame's edge list; every edge
/// contributes both directions.
pub fn derive_adjacency(edges: &[FrameEdge]) -> HashMap<String, Vec<String>> {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    for edge in edges {
        adjacency
            .entry(edge.source.clone())
            .or_default()
            .push(edge.target.clone());
        adjacency
            .entry(edge.target.clone())
            .or_default()
            .push(edge.source.clone());
    }
    adjacency
}

/// Flags nodes whose neighborhood is not a clean single-parent tree
/// attachment: more than one neighbor at strictly lower depth, or any
/// neighbor at equal depth, or any neighbor more than one hop away in depth.
pub fn loop_bridge_nodes(
    adjacency: &HashMap<String, Vec<String>>,
    depth_by_id: &HashMap<String, u32>,
) -> HashSet<String> {
    let mut bridges = HashSet::new();

    for (node_id, neighbors) in adjacency {
        let node_depth = depth_by_id.get(node_id).copied().unwrap_or(0) as i64;

        let mut lower_depth_count = 0usize;
        let mut same_depth_count = 0usize;
        let mut jump_depth_count = 0usize;
        for neighbor_id in neighbors {
            let neighbor_depth = depth_by_id.get(neighbor_id).copied().unwrap_or(0) as i64;
            if neighbor_depth < node_depth {
                lower_depth_count += 1;
            }
            if neighbor_depth == node_depth {
                same_depth_count += 1;
            }
            if (neighbor_depth - node_depth).abs() > 1 {
                jump_depth_count += 1;
            }
        }

        if lower_depth_count > 1 || same_depth_count > 0 || jump_depth_count > 0 {
            bridges.insert(node_id.clone());
        }
    }

    bridges
}

#[derive(Default)]
pub struct SelectedRelatives {
    pub nodes: HashSet<String>,
    pub edges: HashSet<String>,
}

/// Direct neighbors of the selected node and the edges touching it, for
/// highlight emphasis.
pub fn selected_relatives(edges: &[FrameEdge], selected_id: Option<&str>) -> SelectedRelatives {
    let mut relatives = SelectedRelatives::default();
    let Some(selected_id) = selected_id else {
        return relatives;
    };

    for edge in edges {
        if edge.source == selected_id {
            relatives.nodes.insert(edge.target.clone());
            relatives.edges.insert(edge.id.clone());
        }
        if edge.target == selected_id {
            relatives.nodes.insert(edge.source.clone());
            relatives.edges.insert(edge.id.clone());
        }
    }

    relatives
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id: &str, source: &str, target: &str) -> FrameEdge {
        FrameEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            label: None,
        }
    }

    fn depths(entries: &[(&str, u32)]) -> HashMap<String, u32> {
        entries
            .iter()
            .map(|(id, depth)| (id.to_string(), *depth))
            .collect()
    }

    #[test]
    fn adjacency_is_undirected() {
        let adjacency = derive_adjacency(&[edge("e1", "a", "b")]);
        assert_eq!(adjacency["a"], vec!["b".to_string()]);
        assert_eq!(adjacency["b"], vec!["a".to_string()]);
    }

    #[test]
    fn two_lower_depth_neighbors_flag_a_bridge() {
        let edges = [edge("e1", "p1", "x"), edge("e2", "p2", "x")];
        let adjacency = derive_adjacency(&edges);
        let depths = depths(&[("p1", 1), ("p2", 1), ("x", 2)]);

        let bridges = loop_bridge_nodes(&adjacency, &depths);
        assert!(bridges.contains("x"));
    }

    #[test]
    fn a_single_parent_attachment_is_not_a_bridge() {
        let edges = [edge("e1", "p", "x")];
        let adjacency = derive_adjacency(&edges);
        let depths = depths(&[("p", 1), ("x", 2)]);

        let bridges = loop_bridge_nodes(&adjacency, &depths);
        assert!(!bridges.contains("x"));
    }

    #[test]
    fn same_depth_neighbor_flags_both_sides() {
        let edges = [
            edge("e1", "p", "x"),
            edge("e2", "p", "y"),
            edge("e3", "x", "y"),
        ];
        let adjacency = derive_adjacency(&edges);
        let depths = depths(&[("p", 0), ("x", 1), ("y", 1)]);

        let bridges = loop_bridge_nodes(&adjacency, &depths);
        assert!(bridges.contains("x"));
        assert!(bridges.contains("y"));
        assert!(!bridges.contains("p"));
    }

    #[test]
    fn depth_jump_over_one_hop_flags_both_ends() {
        let edges = [edge("e1", "shallow", "deep")];
        let adjacency = derive_adjacency(&edges);
        let depths = depths(&[("shallow", 1), ("deep", 3)]);

        let bridges = loop_bridge_nodes(&adjacency, &depths);
        assert!(bridges.contains("deep"));
        assert!(bridges.contains("shallow"));
    }

    #[test]
    fn relatives_cover_neighbors_and_touching_edges() {
        let edges = [
            edge("e1", "sel", "a"),
            edge("e2", "b", "sel"),
            edge("e3", "a", "b"),
        ];
        let relatives = selected_relatives(&edges, Some("sel"));
        assert_eq!(relatives.nodes, HashSet::from(["a".to_string(), "b".to_string()]));
        assert_eq!(relatives.edges, HashSet::from(["e1".to_string(), "e2".to_string()]));

        let none = selected_relatives(&edges, None);
        assert!(none.nodes.is_empty());
        assert!(none.edges.is_empty());
    }
}
