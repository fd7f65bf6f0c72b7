use visparql_core::client::{Binding, BindingValue};
use visparql_core::graph::{EdgeKind, ElementKind, ElementRef, NodeKind, Selection};
use visparql_core::ontology::{OntologyCache, PrefixCache};
use visparql_core::suggest::{
    suggest_for_edge, suggest_for_node, suggest_for_selection, SelectionGate, Suggestion,
    SuggestionIndex,
};
use visparql_core::{EdgeId, NodeId};

const BASE: &str = "http://example.org/ontology#";
const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

fn fact(property: &str, domain: &str, range: &str) -> Binding {
    let mut b = Binding::new();
    b.insert("s".to_string(), BindingValue::uri(property));
    b.insert("domain".to_string(), BindingValue::uri(domain));
    b.insert("range".to_string(), BindingValue::uri(range));
    b
}

fn library() -> OntologyCache {
    let mut prefixes = PrefixCache::new(BASE);
    let mut ontology = OntologyCache::new();
    ontology.load(
        &[
            fact(&format!("{BASE}has_author"), &format!("{BASE}Book"), &format!("{BASE}Person")),
            fact(&format!("{BASE}title"), &format!("{BASE}Book"), &format!("{XSD}string")),
            fact(&format!("{BASE}pages"), &format!("{BASE}Book"), &format!("{XSD}integer")),
            fact(&format!("{BASE}wrote"), &format!("{BASE}Person"), &format!("{BASE}Book")),
        ],
        &mut prefixes,
    );
    ontology
}

fn selection(element: ElementRef, content: &str, kind: ElementKind) -> Selection {
    Selection {
        element,
        content: content.to_string(),
        kind,
    }
}

#[test]
fn test_node_suggestions_match_domain() {
    let ontology = library();
    let mut indices = SuggestionIndex::default();

    let book = suggest_for_node(NodeId(1), NodeKind::Uri, ":Book", &ontology, &mut indices);
    let properties: Vec<_> = book.iter().map(|s| s.property.qualified_name()).collect();
    assert_eq!(properties, vec![":has_author", ":title", ":pages"]);
    assert!(book.iter().all(|s| s.subject == NodeId(1)));

    // Unprefixed content is its own local name
    let person = suggest_for_node(NodeId(2), NodeKind::Uri, "Person", &ontology, &mut indices);
    assert_eq!(person.len(), 1);
}

#[test]
fn test_variable_with_no_matching_class() {
    let ontology = library();
    let mut indices = SuggestionIndex::default();
    assert!(
        suggest_for_node(NodeId(1), NodeKind::UnboundVariable, "?", &ontology, &mut indices)
            .is_empty()
    );
}

#[test]
fn test_edge_suggestions_by_range() {
    let ontology = library();
    let mut indices = SuggestionIndex::default();

    let author = suggest_for_edge(EdgeId(1), ":has author", &ontology, &mut indices);
    assert_eq!(author.len(), 1);
    assert_eq!(author[0].kind, NodeKind::Uri);
    assert_eq!(author[0].class.label, "Person");

    let pages = suggest_for_edge(EdgeId(1), ":pages", &ontology, &mut indices);
    assert_eq!(pages[0].kind, NodeKind::Literal);
    assert_eq!(pages[0].class.local_name, "integer");
}

#[test]
fn test_indices_are_unique_across_calls() {
    let ontology = library();
    let mut indices = SuggestionIndex::default();
    let mut seen = Vec::new();
    for _ in 0..3 {
        for s in suggest_for_node(NodeId(1), NodeKind::Uri, ":Book", &ontology, &mut indices) {
            assert!(!seen.contains(&s.index));
            seen.push(s.index);
        }
    }
    assert_eq!(seen.len(), 9);
}

#[test]
fn test_selection_dispatch() {
    let ontology = library();
    let mut indices = SuggestionIndex::default();

    let for_node = suggest_for_selection(
        &selection(ElementRef::Node(NodeId(1)), ":Person", ElementKind::Node(NodeKind::Uri)),
        &ontology,
        &mut indices,
    );
    assert!(matches!(for_node.as_slice(), [Suggestion::Edge(_)]));

    let for_edge = suggest_for_selection(
        &selection(
            ElementRef::Edge(EdgeId(4)),
            ":title",
            ElementKind::Edge(EdgeKind::BoundProperty),
        ),
        &ontology,
        &mut indices,
    );
    assert!(matches!(for_edge.as_slice(), [Suggestion::Node(s)] if s.edge == EdgeId(4)));
}

#[test]
fn test_gate_requires_every_field_to_change() {
    let mut gate = SelectionGate::new();
    let node = ElementRef::Node(NodeId(1));
    let uri = ElementKind::Node(NodeKind::Uri);

    assert!(gate.should_recompute(&selection(node, ":Book", uri)));
    // Only content changed
    assert!(!gate.should_recompute(&selection(node, ":Person", uri)));
    // Only kind changed
    assert!(!gate.should_recompute(&selection(
        node,
        ":Person",
        ElementKind::Node(NodeKind::Literal)
    )));
    // Everything changed
    assert!(gate.should_recompute(&selection(
        ElementRef::Edge(EdgeId(1)),
        ":title",
        ElementKind::Edge(EdgeKind::BoundProperty)
    )));
}
