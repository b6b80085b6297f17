use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Rendering category of a node; decides the card's base size and styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Project,
    File,
    Symbol,
}

/// Semantic classification used by the type filter. Hiding a type hides the
/// entire subtree rooted at every node of that type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Function,
    Class,
    Import,
    Export,
    Variable,
    File,
}

impl SemanticType {
    pub const FILTERABLE: [SemanticType; 5] = [
        SemanticType::Function,
        SemanticType::Class,
        SemanticType::Import,
        SemanticType::Export,
        SemanticType::Variable,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Import => "import",
            Self::Export => "export",
            Self::Variable => "variable",
            Self::File => "file",
        }
    }
}

#[derive(Clone, Debug)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub semantic_type: Option<SemanticType>,
    pub label: String,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ProjectGraph {
    pub project_id: String,
    pub root_id: String,
    pub nodes: HashMap<String, GraphNode>,
    pub edges: HashMap<String, GraphEdge>,
    pub child_ids_by_parent: HashMap<String, Vec<String>>,
}

impl ProjectGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
