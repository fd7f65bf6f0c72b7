//! Ontology-driven suggestions for extending the graph.
//!
//! Given the selected node or edge, the engine looks up compatible facts in
//! the [`OntologyCache`]: outgoing properties for a node whose class is a
//! fact's domain, and range classes or datatypes for an edge whose property
//! is a fact's property. The functions here are pure; the only state is the
//! session-wide [`SuggestionIndex`] counter and the [`SelectionGate`].

mod gate;

pub use gate::SelectionGate;

use serde::Serialize;

use crate::config::XSD_NAMESPACE;
use crate::graph::{local_name, EdgeId, ElementKind, ElementRef, NodeId, NodeKind, Selection};
use crate::ontology::{OntologyCache, PrefixCache, TermRef};

/// Hands out suggestion indices that are never reused within a session.
#[derive(Debug, Default)]
pub struct SuggestionIndex {
    next: u64,
}

impl SuggestionIndex {
    pub fn next(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

/// A property that may leave the selected node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeSuggestion {
    pub index: u64,
    /// Node the edge would start from.
    pub subject: NodeId,
    pub property: TermRef,
    pub domain: TermRef,
    pub range: TermRef,
}

/// A class or datatype that may sit at the end of the selected edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSuggestion {
    pub index: u64,
    /// Edge whose object would take this value.
    pub edge: EdgeId,
    /// [`NodeKind::Literal`] for XML Schema datatypes, [`NodeKind::Uri`] otherwise.
    pub kind: NodeKind,
    pub class: TermRef,
}

/// Either kind of suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    Edge(EdgeSuggestion),
    Node(NodeSuggestion),
}

impl Suggestion {
    pub fn index(&self) -> u64 {
        match self {
            Self::Edge(s) => s.index,
            Self::Node(s) => s.index,
        }
    }

    /// Text shown for the suggestion.
    pub fn label(&self) -> String {
        match self {
            Self::Edge(s) => s.property.qualified_name(),
            Self::Node(s) => s.class.qualified_name(),
        }
    }

    /// Picks up prefixes resolved since the suggestion was computed.
    pub fn refresh_prefixes(&mut self, prefixes: &PrefixCache) {
        match self {
            Self::Edge(s) => {
                for term in [&mut s.property, &mut s.domain, &mut s.range] {
                    term.refresh(prefixes);
                }
            }
            Self::Node(s) => {
                s.class.refresh(prefixes);
            }
        }
    }
}

/// Properties whose domain label matches the node's local name.
///
/// Literals have no outgoing suggestions.
pub fn suggest_for_node(
    node: NodeId,
    kind: NodeKind,
    content: &str,
    ontology: &OntologyCache,
    indices: &mut SuggestionIndex,
) -> Vec<EdgeSuggestion> {
    if kind == NodeKind::Literal {
        return Vec::new();
    }
    ontology
        .facts_for_domain(local_name(content))
        .map(|fact| EdgeSuggestion {
            index: indices.next(),
            subject: node,
            property: fact.property.clone(),
            domain: fact.domain.clone(),
            range: fact.range.clone(),
        })
        .collect()
}

/// Range classes and datatypes of every fact whose property label matches
/// the edge's local name.
pub fn suggest_for_edge(
    edge: EdgeId,
    content: &str,
    ontology: &OntologyCache,
    indices: &mut SuggestionIndex,
) -> Vec<NodeSuggestion> {
    ontology
        .facts_for_property(local_name(content))
        .map(|fact| NodeSuggestion {
            index: indices.next(),
            edge,
            kind: if fact.range.expansion == XSD_NAMESPACE {
                NodeKind::Literal
            } else {
                NodeKind::Uri
            },
            class: fact.range.clone(),
        })
        .collect()
}

/// Suggestions for whatever `selection` points at.
pub fn suggest_for_selection(
    selection: &Selection,
    ontology: &OntologyCache,
    indices: &mut SuggestionIndex,
) -> Vec<Suggestion> {
    match (selection.element, selection.kind) {
        (ElementRef::Node(id), ElementKind::Node(kind)) => {
            suggest_for_node(id, kind, &selection.content, ontology, indices)
                .into_iter()
                .map(Suggestion::Edge)
                .collect()
        }
        (ElementRef::Edge(id), ElementKind::Edge(_)) => {
            suggest_for_edge(id, &selection.content, ontology, indices)
                .into_iter()
                .map(Suggestion::Node)
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Class inferred for the object of an edge from the ontology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeInference {
    /// No fact matches the property.
    Unknown,
    /// All matching facts agree on one range.
    Single(TermRef),
    /// Matching facts name several ranges, in first-seen order.
    Amalgam(Vec<TermRef>),
}

impl RangeInference {
    /// Label stored as the node's inferred class.
    pub fn class_label(&self) -> Option<String> {
        match self {
            Self::Unknown => None,
            Self::Single(term) => Some(term.label.clone()),
            Self::Amalgam(terms) => Some(
                terms
                    .iter()
                    .map(|t| t.label.as_str())
                    .collect::<Vec<_>>()
                    .join(" | "),
            ),
        }
    }
}

/// Infers the object class of an edge labelled `content`.
pub fn infer_range(content: &str, ontology: &OntologyCache) -> RangeInference {
    let mut ranges: Vec<TermRef> = Vec::new();
    for fact in ontology.facts_for_property(local_name(content)) {
        if !ranges.iter().any(|r| r.iri == fact.range.iri) {
            ranges.push(fact.range.clone());
        }
    }
    match ranges.len() {
        0 => RangeInference::Unknown,
        1 => RangeInference::Single(ranges.remove(0)),
        _ => RangeInference::Amalgam(ranges),
    }
}
