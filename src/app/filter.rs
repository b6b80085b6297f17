use std::collections::{HashMap, HashSet, VecDeque};

use eframe::egui::Vec2;

use crate::project::{GraphEdge, GraphNode, SemanticType};

/// Per-semantic-type visibility flags. Types without an entry are visible;
/// nodes without a semantic type are never filtered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeVisibility {
    hidden: HashSet<SemanticType>,
}

impl TypeVisibility {
    pub fn is_visible(&self, semantic_type: SemanticType) -> bool {
        !self.hidden.contains(&semantic_type)
    }

    pub fn toggle(&mut self, semantic_type: SemanticType) {
        if !self.hidden.remove(&semantic_type) {
            self.hidden.insert(semantic_type);
        }
    }

    pub fn hide(&mut self, semantic_type: SemanticType) {
        self.hidden.insert(semantic_type);
    }

    pub fn hidden_types(&self) -> Vec<SemanticType> {
        let mut types = self.hidden.iter().copied().collect::<Vec<_>>();
        types.sort_by_key(|semantic_type| semantic_type.label());
        types
    }

    pub fn from_hidden(hidden: impl IntoIterator<Item = SemanticType>) -> Self {
        Self {
            hidden: hidden.into_iter().collect(),
        }
    }
}

pub struct FilteredGraph {
    pub nodes: HashMap<String, GraphNode>,
    pub edges: HashMap<String, GraphEdge>,
    pub child_ids_by_parent: HashMap<String, Vec<String>>,
    pub manual_positions: HashMap<String, Vec2>,
}

/// Cascading visibility filter: a node of a hidden semantic type is excluded
/// together with its whole descendant subtree. Traversal is iterative with a
/// visited set so cyclic or repeated child references terminate.
pub fn filter_subgraph(
    nodes: &HashMap<String, GraphNode>,
    edges: &HashMap<String, GraphEdge>,
    child_ids_by_parent: &HashMap<String, Vec<String>>,
    manual_positions: &HashMap<String, Vec2>,
    visibility: &TypeVisibility,
) -> FilteredGraph {
    let mut excluded: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();

    for node in nodes.values() {
        let Some(semantic_type) = node.semantic_type else {
            continue;
        };
        if visibility.is_visible(semantic_type) {
            continue;
        }
        if excluded.insert(node.id.as_str()) {
            queue.push_back(node.id.as_str());
        }
    }

    while let Some(node_id) = queue.pop_front() {
        let Some(children) = child_ids_by_parent.get(node_id) else {
            continue;
        };
        for child_id in children {
            if excluded.insert(child_id.as_str()) {
                queue.push_back(child_id.as_str());
            }
        }
    }

    let filtered_nodes = nodes
        .iter()
        .filter(|(id, _)| !excluded.contains(id.as_str()))
        .map(|(id, node)| (id.clone(), node.clone()))
        .collect::<HashMap<_, _>>();

    let filtered_edges = edges
        .iter()
        .filter(|(_, edge)| {
            filtered_nodes.contains_key(&edge.source) && filtered_nodes.contains_key(&edge.target)
        })
        .map(|(id, edge)| (id.clone(), edge.clone()))
        .collect::<HashMap<_, _>>();

    let filtered_children = child_ids_by_parent
        .iter()
        .filter(|(parent_id, _)| filtered_nodes.contains_key(parent_id.as_str()))
        .map(|(parent_id, child_ids)| {
            (
                parent_id.clone(),
                child_ids
                    .iter()
                    .filter(|child_id| filtered_nodes.contains_key(child_id.as_str()))
                    .cloned()
                    .collect::<Vec<_>>(),
            )
        })
        .collect::<HashMap<_, _>>();

    let filtered_manual_positions = manual_positions
        .iter()
        .filter(|(id, _)| filtered_nodes.contains_key(id.as_str()))
        .map(|(id, position)| (id.clone(), *position))
        .collect::<HashMap<_, _>>();

    FilteredGraph {
        nodes: filtered_nodes,
        edges: filtered_edges,
        child_ids_by_parent: filtered_children,
        manual_positions: filtered_manual_positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::NodeKind;

    fn node(id: &str, semantic_type: Option<SemanticType>) -> (String, GraphNode) {
        (
            id.to_string(),
            GraphNode {
                id: id.to_string(),
                kind: NodeKind::Symbol,
                semantic_type,
                label: id.to_string(),
                loading: false,
                error: None,
            },
        )
    }

    fn edge(id: &str, source: &str, target: &str) -> (String, GraphEdge) {
        (
            id.to_string(),
            GraphEdge {
                id: id.to_string(),
                source: source.to_string(),
                target: target.to_string(),
                label: None,
            },
        )
    }

    fn fixture() -> (
        HashMap<String, GraphNode>,
        HashMap<String, GraphEdge>,
        HashMap<String, Vec<String>>,
        HashMap<String, Vec2>,
    ) {
        let nodes = HashMap::from([
            node("root", None),
            node("class", Some(SemanticType::Class)),
            node("method", Some(SemanticType::Function)),
            node("standalone", Some(SemanticType::Function)),
        ]);
        let edges = HashMap::from([
            edge("e1", "root", "class"),
            edge("e2", "class", "method"),
            edge("e3", "root", "standalone"),
        ]);
        let children = HashMap::from([
            ("root".to_string(), vec!["class".to_string(), "standalone".to_string()]),
            ("class".to_string(), vec!["method".to_string()]),
        ]);
        let manual = HashMap::from([
            ("method".to_string(), Vec2::new(5.0, 5.0)),
            ("standalone".to_string(), Vec2::new(-3.0, 0.0)),
        ]);
        (nodes, edges, children, manual)
    }

    #[test]
    fn hiding_a_type_excludes_its_subtree() {
        let (nodes, edges, children, manual) = fixture();
        let visibility = TypeVisibility::from_hidden([SemanticType::Class]);

        let filtered = filter_subgraph(&nodes, &edges, &children, &manual, &visibility);

        assert!(!filtered.nodes.contains_key("class"));
        assert!(!filtered.nodes.contains_key("method"), "descendant cascades");
        assert!(filtered.nodes.contains_key("standalone"));
        assert!(filtered.nodes.contains_key("root"), "untyped never excluded");
    }

    #[test]
    fn no_edge_references_an_excluded_id() {
        let (nodes, edges, children, manual) = fixture();
        let visibility = TypeVisibility::from_hidden([SemanticType::Class]);

        let filtered = filter_subgraph(&nodes, &edges, &children, &manual, &visibility);

        for edge in filtered.edges.values() {
            assert!(filtered.nodes.contains_key(&edge.source));
            assert!(filtered.nodes.contains_key(&edge.target));
        }
        assert_eq!(filtered.edges.len(), 1);
        assert!(filtered.edges.contains_key("e3"));
    }

    #[test]
    fn child_lists_and_manual_positions_keep_only_survivors() {
        let (nodes, edges, children, manual) = fixture();
        let visibility = TypeVisibility::from_hidden([SemanticType::Class]);

        let filtered = filter_subgraph(&nodes, &edges, &children, &manual, &visibility);

        assert_eq!(
            filtered.child_ids_by_parent.get("root"),
            Some(&vec!["standalone".to_string()])
        );
        assert!(!filtered.child_ids_by_parent.contains_key("class"));
        assert!(filtered.manual_positions.contains_key("standalone"));
        assert!(!filtered.manual_positions.contains_key("method"));
    }

    #[test]
    fn filtering_is_idempotent() {
        let (nodes, edges, children, manual) = fixture();
        let visibility = TypeVisibility::from_hidden([SemanticType::Class]);

        let once = filter_subgraph(&nodes, &edges, &children, &manual, &visibility);
        let twice = filter_subgraph(
            &once.nodes,
            &once.edges,
            &once.child_ids_by_parent,
            &once.manual_positions,
            &visibility,
        );

        let mut first = once.nodes.keys().collect::<Vec<_>>();
        let mut second = twice.nodes.keys().collect::<Vec<_>>();
        first.sort();
        second.sort();
        assert_eq!(first, second);
        assert_eq!(once.edges.len(), twice.edges.len());
    }

    #[test]
    fn cyclic_child_references_terminate() {
        let (mut nodes, edges, mut children, manual) = fixture();
        nodes.extend([node("a", Some(SemanticType::Variable))]);
        children.insert("a".to_string(), vec!["class".to_string()]);
        children.insert("class".to_string(), vec!["method".to_string(), "a".to_string()]);
        let visibility = TypeVisibility::from_hidden([SemanticType::Variable]);

        let filtered = filter_subgraph(&nodes, &edges, &children, &manual, &visibility);

        assert!(!filtered.nodes.contains_key("a"));
        assert!(!filtered.nodes.contains_key("class"));
        assert!(!filtered.nodes.contains_key("method"));
    }
}
