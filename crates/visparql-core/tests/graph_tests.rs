use visparql_core::graph::{
    CanvasMode, ClickOutcome, EdgeCompletion, EdgeKind, ElementRef, GraphError, GraphEvent,
    GraphStore, NodeKind,
};
use visparql_core::Point;

fn store_with_pair() -> (GraphStore, visparql_core::NodeId, visparql_core::NodeId) {
    let mut store = GraphStore::default();
    let a = store.create_node(Point::new(0.0, 0.0), NodeKind::UnboundVariable, "?");
    let b = store.create_node(Point::new(300.0, 0.0), NodeKind::UnboundVariable, "?");
    (store, a, b)
}

fn incomplete_count(store: &GraphStore) -> usize {
    store.edges().iter().filter(|e| !e.complete).count()
}

#[test]
fn test_classification_order() {
    let mut store = GraphStore::default();
    let node = store.create_node(Point::new(0.0, 0.0), NodeKind::UnboundVariable, "?");

    let cases = [
        ("42", NodeKind::Literal),
        ("?x", NodeKind::SelectedVariable),
        ("?", NodeKind::UnboundVariable),
        ("ex:Person", NodeKind::Uri),
        ("\"hello\"", NodeKind::Literal),
        ("3.14", NodeKind::Literal),
        ("true", NodeKind::Literal),
        ("\"chat\"@fr", NodeKind::Literal),
        ("http://example.org/a", NodeKind::Uri),
        ("Person", NodeKind::Uri),
    ];
    for (content, expected) in cases {
        let kind = store.update_node_content(node, content).unwrap();
        assert_eq!(kind, expected, "content {content:?}");
        assert_eq!(store.node(node).unwrap().kind, expected);
    }
}

#[test]
fn test_literal_node_gets_wide_shape() {
    let mut store = GraphStore::default();
    let node = store.create_node(Point::new(0.0, 0.0), NodeKind::UnboundVariable, "?");
    let square = store.node(node).unwrap().shape;

    store.update_node_content(node, "\"Alice\"").unwrap();
    let literal = store.node(node).unwrap().shape;
    assert!(literal.width > square.width);
    assert!(literal.height < square.height);
}

#[test]
fn test_at_most_one_incomplete_edge() {
    let (mut store, a, b) = store_with_pair();
    let c = store.create_node(Point::new(0.0, 300.0), NodeKind::UnboundVariable, "?");

    let first = store.create_edge_from_existing_node(a, "?").unwrap();
    assert!(first.is_some());
    assert_eq!(incomplete_count(&store), 1);

    // Refused while the first is still being drawn
    assert_eq!(store.create_edge_from_existing_node(b, "?").unwrap(), None);
    assert_eq!(store.create_edge_from_existing_node(c, "?").unwrap(), None);
    assert_eq!(incomplete_count(&store), 1);

    assert!(matches!(store.complete_edge(b).unwrap(), EdgeCompletion::Completed(_)));
    assert_eq!(incomplete_count(&store), 0);
    assert!(!store.edge_completing());

    let second = store.create_edge_from_existing_node(b, "?").unwrap();
    assert!(second.is_some());
    assert_eq!(incomplete_count(&store), 1);
    store.validate().unwrap();
}

#[test]
fn test_complete_without_drawing_fails() {
    let (mut store, _, b) = store_with_pair();
    assert_eq!(store.complete_edge(b), Err(GraphError::NoIncompleteEdge));
}

#[test]
fn test_follow_pointer() {
    let (mut store, a, _) = store_with_pair();
    // No edge yet: nothing happens
    store.follow_pointer(Point::new(50.0, 50.0));
    assert!(store.edges().is_empty());

    let edge = store.create_edge_from_existing_node(a, "?").unwrap().unwrap();
    store.follow_pointer(Point::new(120.0, 80.0));
    let edge = store.edge(edge).unwrap();
    assert_eq!(edge.object.point(), Point::new(120.0, 80.0));
    assert_eq!(edge.object.node(), None);
}

#[test]
fn test_cascade_deletion() {
    let (mut store, a, b) = store_with_pair();
    let c = store.create_node(Point::new(0.0, 300.0), NodeKind::UnboundVariable, "?");
    store.connect(a, b, ":p").unwrap();
    store.connect(b, c, ":q").unwrap();
    store.connect(c, a, ":r").unwrap();

    let removed = store.delete_cascade(b).unwrap();
    assert_eq!(removed.len(), 2);
    assert!(store.edges().iter().all(|e| !e.touches(b)));
    assert_eq!(store.edges().len(), 1);
    assert!(store.node(b).is_none());
    store.validate().unwrap();
}

#[test]
fn test_delete_drawing_subject_clears_completing() {
    let (mut store, a, _) = store_with_pair();
    store.create_edge_from_existing_node(a, "?").unwrap();
    store.delete_cascade(a).unwrap();
    assert!(!store.edge_completing());
    assert_eq!(incomplete_count(&store), 0);
}

#[test]
fn test_delete_missing_node() {
    let mut store = GraphStore::default();
    assert!(matches!(
        store.delete_cascade(visparql_core::NodeId(9)),
        Err(GraphError::NodeNotFound(_))
    ));
}

#[test]
fn test_optionality_propagation() {
    let (mut store, a, b) = store_with_pair();
    let edge = store.connect(a, b, ":p").unwrap();

    store.set_optional(edge, true).unwrap();
    assert!(store.edge(edge).unwrap().is_optional);
    assert!(store.node(a).unwrap().is_optional);
    assert!(store.node(b).unwrap().is_optional);

    store.set_optional(edge, false).unwrap();
    assert!(!store.node(a).unwrap().is_optional);
    assert!(!store.node(b).unwrap().is_optional);
}

#[test]
fn test_edge_content_reclassification() {
    let (mut store, a, b) = store_with_pair();
    let edge = store.connect(a, b, "?").unwrap();
    assert_eq!(store.edge(edge).unwrap().kind, EdgeKind::UnboundProperty);
    assert!(!store.edge(edge).unwrap().is_selected());

    assert_eq!(
        store.update_edge_content(edge, "?rel").unwrap(),
        EdgeKind::UnboundProperty
    );
    assert!(store.edge(edge).unwrap().is_selected());

    assert_eq!(
        store.update_edge_content(edge, "foaf:knows").unwrap(),
        EdgeKind::BoundProperty
    );
    assert!(!store.edge(edge).unwrap().is_selected());
}

#[test]
fn test_delete_edge_keeps_nodes() {
    let (mut store, a, b) = store_with_pair();
    let edge = store.connect(a, b, ":p").unwrap();
    store.delete_edge(edge).unwrap();
    assert!(store.edges().is_empty());
    assert_eq!(store.nodes().len(), 2);
    assert!(matches!(store.delete_edge(edge), Err(GraphError::EdgeNotFound(_))));
}

#[test]
fn test_selection_events() {
    let mut store = GraphStore::default();
    let mut rx = store.subscribe();
    let node = store.create_node(Point::new(0.0, 0.0), NodeKind::UnboundVariable, "?");

    // Drain creation events
    while rx.try_recv().is_ok() {}

    store.update_node_content(node, "?who").unwrap();
    let mut selections = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let GraphEvent::SelectionChanged(selection) = event {
            selections.push(selection);
        }
    }
    assert_eq!(selections.len(), 1);
    assert_eq!(selections[0].element, ElementRef::Node(node));
    assert_eq!(selections[0].content, "?who");

    store.clear_selection();
    assert!(matches!(rx.try_recv(), Ok(GraphEvent::SelectionCleared)));
    assert!(store.selection().is_none());
}

#[test]
fn test_click_in_drag_mode_selects() {
    let (mut store, a, _) = store_with_pair();
    assert_eq!(store.mode(), CanvasMode::Drag);

    let outcome = store.click(Point::new(0.0, 0.0), Some(a)).unwrap();
    assert_eq!(outcome, ClickOutcome::NodeSelected { node: a });
    assert_eq!(store.selection().unwrap().element, ElementRef::Node(a));

    let outcome = store.click(Point::new(900.0, 900.0), None).unwrap();
    assert_eq!(outcome, ClickOutcome::Ignored);
    assert!(store.selection().is_none());
}

#[test]
fn test_clear_keeps_counting_ids() {
    let (mut store, _, b) = store_with_pair();
    store.clear();
    assert!(store.nodes().is_empty());
    let c = store.create_node(Point::new(0.0, 0.0), NodeKind::UnboundVariable, "?");
    assert!(c.0 > b.0);
}

#[test]
fn test_snapshot_serializes() {
    let (mut store, a, b) = store_with_pair();
    store.connect(a, b, ":p").unwrap();
    let json = serde_json::to_value(store.snapshot()).unwrap();
    assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(json["edges"][0]["subject"]["type"], "anchored");
    assert_eq!(json["edges"][0]["kind"], "BoundProperty");
}
