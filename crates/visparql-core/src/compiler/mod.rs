//! Graph to SPARQL compilation.
//!
//! [`compile`] turns a [`GraphSnapshot`] into a SELECT query. It is pure:
//! the same snapshot and prefix cache always give the same string.
//!
//! Layout of the output:
//!
//! ```text
//! SELECT ?a ?b
//! WHERE {
//!   ?a <http://ex/knows> ?b .
//!   OPTIONAL { ?b <http://ex/name> ?n . }
//! }
//! <order clause, currently empty>
//! ```

mod error;

pub use error::CompileError;

use std::collections::HashMap;

use crate::config::UNBOUND_CONTENT;
use crate::graph::{Edge, EdgeId, EdgeKind, GraphSnapshot, Node, NodeId, NodeKind};
use crate::ontology::PrefixCache;

/// SPARQL text for one graph element.
#[derive(Debug, Clone)]
struct Fragment {
    text: String,
    selected: bool,
}

/// Compiles the graph into a query string.
///
/// Fails with [`CompileError::NoSelectedOutputs`] when no node or edge is
/// marked for output. Edges still being drawn are left out.
pub fn compile(graph: &GraphSnapshot, prefixes: &PrefixCache) -> Result<String, CompileError> {
    let nodes: HashMap<NodeId, Fragment> = graph
        .nodes
        .iter()
        .map(|n| (n.id, node_fragment(n, prefixes)))
        .collect();
    let edges: HashMap<EdgeId, Fragment> = graph
        .edges
        .iter()
        .map(|e| (e.id, edge_fragment(e, prefixes)))
        .collect();

    let select = select_clause(graph, &nodes, &edges)?;
    let body = where_clause(graph, &nodes, &edges)?;
    let order = order_clause();

    Ok(format!("{select}\n{body}{order}\n"))
}

fn select_clause(
    graph: &GraphSnapshot,
    nodes: &HashMap<NodeId, Fragment>,
    edges: &HashMap<EdgeId, Fragment>,
) -> Result<String, CompileError> {
    let mut outputs: Vec<&str> = Vec::new();
    let selected = graph
        .nodes
        .iter()
        .filter_map(|n| nodes.get(&n.id))
        .chain(graph.edges.iter().filter_map(|e| edges.get(&e.id)))
        .filter(|f| f.selected);
    for fragment in selected {
        if !outputs.contains(&fragment.text.as_str()) {
            outputs.push(&fragment.text);
        }
    }

    if outputs.is_empty() {
        return Err(CompileError::NoSelectedOutputs);
    }

    let mut clause = String::from("SELECT ");
    for output in outputs {
        clause.push_str(output);
        clause.push(' ');
    }
    Ok(clause)
}

fn where_clause(
    graph: &GraphSnapshot,
    nodes: &HashMap<NodeId, Fragment>,
    edges: &HashMap<EdgeId, Fragment>,
) -> Result<String, CompileError> {
    let mut clause = String::from("WHERE {\n");

    for edge in graph.edges.iter().filter(|e| e.complete) {
        let endpoint = |node: Option<NodeId>| {
            node.and_then(|id| nodes.get(&id))
                .map(|f| f.text.as_str())
                .ok_or(CompileError::InvalidGraphReference {
                    edge: edge.id,
                    node: node.unwrap_or(NodeId(0)),
                })
        };
        let subject = endpoint(edge.subject.node())?;
        let object = endpoint(edge.object.node())?;
        let property = edges
            .get(&edge.id)
            .map(|f| f.text.as_str())
            .unwrap_or(UNBOUND_CONTENT);

        let triple = format!("{subject} {property} {object} .");
        if edge.is_optional {
            clause.push_str(&format!("  OPTIONAL {{ {triple} }}\n"));
        } else {
            clause.push_str(&format!("  {triple}\n"));
        }
    }

    clause.push_str("}\n");
    Ok(clause)
}

/// Ordering is not configurable yet.
fn order_clause() -> String {
    String::new()
}

fn node_fragment(node: &Node, prefixes: &PrefixCache) -> Fragment {
    match node.kind {
        NodeKind::UnboundVariable | NodeKind::SelectedVariable => Fragment {
            text: variable_name(&node.content, "node", node.id.0),
            selected: node.is_selected(),
        },
        NodeKind::Uri => Fragment {
            text: render_iri(&node.content, prefixes),
            selected: false,
        },
        NodeKind::Literal => Fragment {
            text: node.content.clone(),
            selected: false,
        },
        NodeKind::Amalgam | NodeKind::Placeholder => Fragment {
            text: format!("?node{}", node.id.0),
            selected: false,
        },
    }
}

fn edge_fragment(edge: &Edge, prefixes: &PrefixCache) -> Fragment {
    match edge.kind {
        EdgeKind::UnboundProperty => Fragment {
            text: variable_name(&edge.content, "edge", edge.id.0),
            selected: edge.is_selected(),
        },
        EdgeKind::BoundProperty => Fragment {
            text: render_iri(&edge.content, prefixes),
            selected: false,
        },
    }
}

/// `?node<id>` for an anonymous variable, the content itself otherwise.
fn variable_name(content: &str, role: &str, id: u32) -> String {
    if content == UNBOUND_CONTENT {
        format!("?{role}{id}")
    } else {
        content.to_string()
    }
}

/// Renders IRI content as SPARQL.
///
/// Prefixed names with a known prefix are expanded; any other content is
/// taken as an IRI and wrapped in angle brackets.
fn render_iri(content: &str, prefixes: &PrefixCache) -> String {
    if content.starts_with('<') && content.ends_with('>') {
        return content.to_string();
    }
    if let Some((prefix, local)) = content.split_once(':') {
        if let Some(expansion) = prefixes.lookup_expansion(prefix) {
            return format!("<{expansion}{local}>");
        }
    }
    format!("<{content}>")
}
