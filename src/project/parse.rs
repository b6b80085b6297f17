use std::collections::{HashMap, HashSet};

use anyhow::{Result, anyhow};
use serde::Deserialize;

use super::graph::{GraphEdge, GraphNode, NodeKind, ProjectGraph, SemanticType};

#[derive(Debug, Deserialize)]
struct RawProject {
    #[serde(rename = "projectId")]
    project_id: String,
    #[serde(rename = "rootId")]
    root_id: String,
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    kind: NodeKind,
    #[serde(default, rename = "semanticType")]
    semantic_type: Option<SemanticType>,
    label: String,
    #[serde(default)]
    children: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    id: String,
    source: String,
    target: String,
    #[serde(default)]
    label: Option<String>,
}

/// Parses a project graph file. References to unknown ids are dropped rather
/// than rejected so a partially exported project still renders.
pub(super) fn parse_project_json(raw: &str) -> Result<ProjectGraph> {
    let parsed: RawProject = serde_json::from_str(raw)?;

    let mut nodes = HashMap::with_capacity(parsed.nodes.len());
    let mut child_ids_by_parent: HashMap<String, Vec<String>> = HashMap::new();

    for raw_node in &parsed.nodes {
        if raw_node.id.is_empty() || nodes.contains_key(&raw_node.id) {
            continue;
        }

        nodes.insert(
            raw_node.id.clone(),
            GraphNode {
                id: raw_node.id.clone(),
                kind: raw_node.kind,
                semantic_type: raw_node.semantic_type,
                label: raw_node.label.clone(),
                loading: false,
                error: None,
            },
        );
    }

    if nodes.is_empty() {
        return Err(anyhow!("project file contains no nodes"));
    }
    if !nodes.contains_key(&parsed.root_id) {
        return Err(anyhow!(
            "root node {} is not present in the node list",
            parsed.root_id
        ));
    }

    let known_ids = nodes.keys().cloned().collect::<HashSet<_>>();

    for raw_node in &parsed.nodes {
        let mut seen_children = HashSet::new();
        let children = raw_node
            .children
            .iter()
            .filter(|child_id| known_ids.contains(*child_id) && **child_id != raw_node.id)
            .filter(|child_id| seen_children.insert(child_id.as_str()))
            .cloned()
            .collect::<Vec<_>>();

        if !children.is_empty() && known_ids.contains(&raw_node.id) {
            child_ids_by_parent.insert(raw_node.id.clone(), children);
        }
    }

    let mut edges = HashMap::with_capacity(parsed.edges.len());
    for raw_edge in parsed.edges {
        if raw_edge.id.is_empty()
            || !known_ids.contains(&raw_edge.source)
            || !known_ids.contains(&raw_edge.target)
        {
            continue;
        }

        edges.insert(
            raw_edge.id.clone(),
            GraphEdge {
                id: raw_edge.id,
                source: raw_edge.source,
                target: raw_edge.target,
                label: raw_edge.label,
            },
        );
    }

    Ok(ProjectGraph {
        project_id: parsed.project_id,
        root_id: parsed.root_id,
        nodes,
        edges,
        child_ids_by_parent,
    })
}
