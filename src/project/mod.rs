mod graph;
mod mock;
mod parse;

use std::path::PathBuf;

use anyhow::{Context, Result};

pub use graph::{GraphEdge, GraphNode, NodeKind, ProjectGraph, SemanticType};
pub use mock::mock_project;

#[derive(Clone, Debug)]
pub enum ProjectSource {
    Mock,
    File(PathBuf),
}

impl ProjectSource {
    pub fn is_mock(&self) -> bool {
        matches!(self, Self::Mock)
    }
}

pub fn collect_project_graph(source: &ProjectSource) -> Result<ProjectGraph> {
    match source {
        ProjectSource::Mock => Ok(mock_project()),
        ProjectSource::File(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read project file {}", path.display()))?;
            parse::parse_project_json(&raw)
                .with_context(|| format!("failed to parse project file {}", path.display()))
        }
    }
}
