use std::collections::HashMap;

use super::graph::{GraphEdge, GraphNode, NodeKind, ProjectGraph, SemanticType};

/// Deterministic sample project used when no project file is supplied. The
/// edge set deliberately contains a cycle (parser -> lexer -> tokens ->
/// parser) and a depth jump (root file straight into a deep symbol) so the
/// loop-bridge emphasis is visible out of the box.
pub fn mock_project() -> ProjectGraph {
    let mut nodes = HashMap::new();
    let mut edges = HashMap::new();
    let mut child_ids_by_parent: HashMap<String, Vec<String>> = HashMap::new();

    let mut add_node = |nodes: &mut HashMap<String, GraphNode>,
                        id: &str,
                        kind: NodeKind,
                        semantic_type: Option<SemanticType>,
                        label: &str| {
        nodes.insert(
            id.to_string(),
            GraphNode {
                id: id.to_string(),
                kind,
                semantic_type,
                label: label.to_string(),
                loading: false,
                error: None,
            },
        );
    };

    add_node(&mut nodes, "root", NodeKind::Project, None, "sample-app");

    let files = [
        ("file:main", "src/main.rs"),
        ("file:parser", "src/parser.rs"),
        ("file:lexer", "src/lexer.rs"),
        ("file:tokens", "src/tokens.rs"),
        ("file:config", "src/config.rs"),
    ];
    for (id, label) in files {
        add_node(&mut nodes, id, NodeKind::File, Some(SemanticType::File), label);
    }

    let symbols = [
        ("fn:main", SemanticType::Function, "main", "file:main"),
        ("fn:run", SemanticType::Function, "run", "file:main"),
        ("import:parser", SemanticType::Import, "import:parser:parse", "file:main"),
        ("fn:parse", SemanticType::Function, "parse", "file:parser"),
        ("class:parser", SemanticType::Class, "Parser", "file:parser"),
        ("var:precedence", SemanticType::Variable, "PRECEDENCE", "file:parser"),
        ("fn:tokenize", SemanticType::Function, "tokenize", "file:lexer"),
        ("class:lexer", SemanticType::Class, "Lexer", "file:lexer"),
        ("export:token", SemanticType::Export, "Token", "file:tokens"),
        ("class:token", SemanticType::Class, "Token", "file:tokens"),
        ("fn:load", SemanticType::Function, "load_config", "file:config"),
        ("var:defaults", SemanticType::Variable, "DEFAULTS", "file:config"),
        ("export:settings", SemanticType::Export, "Settings", "file:config"),
    ];
    for (id, semantic_type, label, _parent) in symbols {
        add_node(&mut nodes, id, NodeKind::Symbol, Some(semantic_type), label);
    }

    child_ids_by_parent.insert(
        "root".to_string(),
        files.iter().map(|(id, _)| id.to_string()).collect(),
    );
    for (id, _semantic_type, _label, parent) in symbols {
        child_ids_by_parent
            .entry(parent.to_string())
            .or_default()
            .push(id.to_string());
    }

    let mut add_edge = |edges: &mut HashMap<String, GraphEdge>,
                        id: &str,
                        source: &str,
                        target: &str,
                        label: Option<&str>| {
        edges.insert(
            id.to_string(),
            GraphEdge {
                id: id.to_string(),
                source: source.to_string(),
                target: target.to_string(),
                label: label.map(str::to_string),
            },
        );
    };

    for (parent, children) in &child_ids_by_parent {
        for child in children {
            let id = format!("tree:{parent}:{child}");
            add_edge(&mut edges, &id, parent, child, None);
        }
    }

    // Cross references: a cycle between the parsing files and a jump from the
    // entry file deep into the token class.
    add_edge(&mut edges, "ref:parse-tokenize", "fn:parse", "fn:tokenize", Some("calls"));
    add_edge(&mut edges, "ref:tokenize-token", "fn:tokenize", "class:token", Some("yields"));
    add_edge(&mut edges, "ref:token-parse", "class:token", "fn:parse", Some("feeds"));
    add_edge(&mut edges, "ref:main-token", "file:main", "class:token", Some("uses"));
    add_edge(&mut edges, "ref:run-load", "fn:run", "fn:load", Some("calls"));
    add_edge(&mut edges, "ref:parser-lexer", "class:parser", "class:lexer", Some("owns"));

    ProjectGraph {
        project_id: "mock".to_string(),
        root_id: "root".to_string(),
        nodes,
        edges,
        child_ids_by_parent,
    }
}
