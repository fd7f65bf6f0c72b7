//! Editable query graph.
//!
//! The [`GraphStore`] is the single owner and writer of nodes and edges. It
//! hands out monotonically increasing ids, keeps edge anchor points on node
//! outlines through the [geometry](crate::geometry) engine, and enforces the
//! graph invariants:
//!
//! - every anchored endpoint references an existing node
//! - at most one edge is incomplete (being drawn) at any time
//! - an edge and both its endpoint nodes share the same optionality
//!
//! Collaborators observe the store through [`GraphEvent`]s delivered on an
//! unbounded channel obtained from [`GraphStore::subscribe`].

mod classify;
mod error;
mod events;
mod mode;
mod model;

pub use classify::{classify_edge_content, classify_node_content, is_literal, local_name};
pub use error::GraphError;
pub use events::GraphEvent;
pub use mode::{CanvasMode, ClickOutcome};
pub use model::{
    Edge, EdgeId, EdgeKind, ElementKind, ElementRef, Endpoint, GraphSnapshot, Node, NodeId,
    NodeKind, Selection,
};

use tokio::sync::mpsc;

use crate::config::{ShapeConfig, NEW_EDGE_POINTER_OFFSET, UNBOUND_CONTENT};
use crate::geometry::{boundary_intersection, GeometryError, Point};

/// Result of trying to finish the edge being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeCompletion {
    /// The edge is anchored to the destination and complete.
    Completed(EdgeId),
    /// Geometry found no crossing; the edge stays incomplete.
    Pending(EdgeId),
}

/// Owner of the query graph.
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_node_id: u32,
    next_edge_id: u32,
    edge_completing: bool,
    mode: CanvasMode,
    selection: Option<ElementRef>,
    shapes: ShapeConfig,
    events: Option<mpsc::UnboundedSender<GraphEvent>>,
}

impl GraphStore {
    /// Creates an empty graph whose node outlines follow `shapes`.
    pub fn new(shapes: ShapeConfig) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            next_node_id: 1,
            next_edge_id: 1,
            edge_completing: false,
            mode: CanvasMode::default(),
            selection: None,
            shapes,
            events: None,
        }
    }

    /// Returns a receiver for graph events. Replaces any previous subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<GraphEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// True while an edge is being drawn.
    pub fn edge_completing(&self) -> bool {
        self.edge_completing
    }

    /// The edge being drawn, if any.
    pub fn incomplete_edge(&self) -> Option<&Edge> {
        self.edges.iter().find(|e| !e.complete)
    }

    pub fn mode(&self) -> CanvasMode {
        self.mode
    }

    pub fn shapes(&self) -> &ShapeConfig {
        &self.shapes
    }

    /// The active selection with its current content and kind.
    pub fn selection(&self) -> Option<Selection> {
        self.selection.and_then(|element| self.describe(element))
    }

    /// Copies the graph for the compiler and other readers.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Checks the graph invariants.
    pub fn validate(&self) -> Result<(), GraphError> {
        for edge in &self.edges {
            for endpoint in [edge.subject, edge.object] {
                if let Some(node) = endpoint.node() {
                    if self.node(node).is_none() {
                        return Err(GraphError::InvalidGraphReference { edge: edge.id, node });
                    }
                }
            }
        }
        let incomplete = self.edges.iter().filter(|e| !e.complete).count();
        if incomplete > 1 {
            return Err(GraphError::TooManyIncompleteEdges(incomplete));
        }
        Ok(())
    }

    // =========================================================================
    // Mode and selection
    // =========================================================================

    /// Switches the canvas mode. Modes never change implicitly.
    pub fn set_mode(&mut self, mode: CanvasMode) {
        tracing::debug!(mode = mode.display_name(), "canvas mode changed");
        self.mode = mode;
    }

    /// Makes `element` the active selection.
    pub fn select(&mut self, element: ElementRef) -> Result<Selection, GraphError> {
        let selection = self.describe(element).ok_or(match element {
            ElementRef::Node(id) => GraphError::NodeNotFound(id),
            ElementRef::Edge(id) => GraphError::EdgeNotFound(id),
        })?;
        self.selection = Some(element);
        self.emit(GraphEvent::SelectionChanged(selection.clone()));
        Ok(selection)
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.emit(GraphEvent::SelectionCleared);
        }
    }

    /// Dispatches a canvas click according to the current mode.
    ///
    /// `hit` is the node under the pointer, if any.
    pub fn click(
        &mut self,
        position: Point,
        hit: Option<NodeId>,
    ) -> Result<ClickOutcome, GraphError> {
        match (self.mode, hit) {
            (CanvasMode::PlaceNode, None) => {
                let node = self.create_node(position, NodeKind::UnboundVariable, UNBOUND_CONTENT);
                Ok(ClickOutcome::NodeCreated { node })
            }
            (CanvasMode::Drag, Some(node)) | (CanvasMode::PlaceNode, Some(node)) => {
                self.select(ElementRef::Node(node))?;
                Ok(ClickOutcome::NodeSelected { node })
            }
            (CanvasMode::DrawEdge, Some(node)) => {
                if self.edge_completing {
                    match self.complete_edge(node)? {
                        EdgeCompletion::Completed(edge) => Ok(ClickOutcome::EdgeCompleted { edge }),
                        EdgeCompletion::Pending(edge) => Ok(ClickOutcome::EdgePending { edge }),
                    }
                } else {
                    Ok(self
                        .create_edge_from_existing_node(node, UNBOUND_CONTENT)?
                        .map_or(ClickOutcome::Ignored, |edge| ClickOutcome::EdgeStarted { edge }))
                }
            }
            (CanvasMode::DrawEdge, None) => {
                self.follow_pointer(position);
                Ok(ClickOutcome::Ignored)
            }
            (CanvasMode::Drag, None) => {
                self.clear_selection();
                Ok(ClickOutcome::Ignored)
            }
        }
    }

    // =========================================================================
    // Node mutations
    // =========================================================================

    /// Adds a node and returns its id.
    ///
    /// Every node except a placeholder becomes the active selection.
    pub fn create_node(
        &mut self,
        position: Point,
        kind: NodeKind,
        content: impl Into<String>,
    ) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;

        let node = Node {
            id,
            kind,
            content: content.into(),
            position,
            shape: kind.shape(position, &self.shapes),
            is_optional: false,
            inferred_class: None,
        };
        tracing::debug!(node = %id, ?kind, content = %node.content, "node created");
        self.nodes.push(node);
        self.changed();

        if kind != NodeKind::Placeholder {
            // The node was just pushed, so selection cannot fail.
            let _ = self.select(ElementRef::Node(id));
        }
        id
    }

    /// Replaces a node's content and reclassifies it. Returns the new kind.
    pub fn update_node_content(
        &mut self,
        id: NodeId,
        content: impl Into<String>,
    ) -> Result<NodeKind, GraphError> {
        let content = content.into();
        let kind = classify_node_content(&content);
        let shapes = self.shapes.clone();

        let node = self.node_mut(id)?;
        node.kind = kind;
        node.content = content;
        node.shape = kind.shape(node.position, &shapes);
        tracing::debug!(node = %id, ?kind, "node content updated");

        self.reanchor_edges_of(id);
        self.changed();
        self.reselect_if(ElementRef::Node(id));
        Ok(kind)
    }

    /// Records the class inferred for a variable node.
    ///
    /// With `amalgam` set, an unbound variable becomes an [`NodeKind::Amalgam`].
    /// Returns false when the node is not an unbound variable or amalgam and was left as is.
    pub fn infer_class(
        &mut self,
        id: NodeId,
        class: impl Into<String>,
        amalgam: bool,
    ) -> Result<bool, GraphError> {
        let shapes = self.shapes.clone();
        let node = self.node_mut(id)?;
        if !matches!(node.kind, NodeKind::UnboundVariable | NodeKind::Amalgam) {
            return Ok(false);
        }
        node.inferred_class = Some(class.into());
        let kind = if amalgam {
            NodeKind::Amalgam
        } else {
            NodeKind::UnboundVariable
        };
        node.kind = kind;
        node.shape = kind.shape(node.position, &shapes);
        self.changed();
        Ok(true)
    }

    /// Sets or clears the inferred class without touching the kind.
    pub fn set_inferred_class(
        &mut self,
        id: NodeId,
        class: Option<String>,
    ) -> Result<(), GraphError> {
        self.node_mut(id)?.inferred_class = class;
        self.changed();
        Ok(())
    }

    /// Sets kind, content and inferred class directly, bypassing classification.
    ///
    /// Used when a suggestion decides the node's kind, for example an empty
    /// literal waiting for the user to type its value.
    pub fn assign_node(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        content: impl Into<String>,
        inferred_class: Option<String>,
    ) -> Result<(), GraphError> {
        let shapes = self.shapes.clone();
        let node = self.node_mut(id)?;
        node.kind = kind;
        node.content = content.into();
        node.inferred_class = inferred_class;
        node.shape = kind.shape(node.position, &shapes);
        tracing::debug!(node = %id, ?kind, "node assigned");

        self.reanchor_edges_of(id);
        self.changed();
        self.reselect_if(ElementRef::Node(id));
        Ok(())
    }

    /// Moves a node and re-anchors every complete edge touching it.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        node.position = position;
        node.shape = node.shape.at(position);

        self.reanchor_edges_of(id);
        self.changed();
        Ok(())
    }

    /// Removes a node and every edge that references it. Returns the removed edges.
    pub fn delete_cascade(&mut self, id: NodeId) -> Result<Vec<EdgeId>, GraphError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(GraphError::NodeNotFound(id))?;
        self.nodes.remove(index);

        let removed: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|e| e.touches(id))
            .map(|e| e.id)
            .collect();
        self.edges.retain(|e| !e.touches(id));
        self.edge_completing = self.edges.iter().any(|e| !e.complete);

        let selection_gone = match self.selection {
            Some(ElementRef::Node(n)) => n == id,
            Some(ElementRef::Edge(e)) => removed.contains(&e),
            None => false,
        };
        if selection_gone {
            self.clear_selection();
        }

        tracing::debug!(node = %id, edges = removed.len(), "node deleted with its edges");
        self.changed();
        Ok(removed)
    }

    // =========================================================================
    // Edge mutations
    // =========================================================================

    /// Starts drawing an edge from an existing node.
    ///
    /// The free endpoint starts one unit away from the subject so the segment
    /// never has zero length. Returns `None` without changing anything when an
    /// edge is already being drawn.
    pub fn create_edge_from_existing_node(
        &mut self,
        subject: NodeId,
        initial_content: impl Into<String>,
    ) -> Result<Option<EdgeId>, GraphError> {
        let origin = self
            .node(subject)
            .ok_or(GraphError::NodeNotFound(subject))?
            .position;

        if let Some(pending) = self.incomplete_edge() {
            tracing::warn!(
                pending = %pending.id,
                "an edge is already being drawn; ignoring new edge request"
            );
            return Ok(None);
        }

        let content = initial_content.into();
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;

        self.edges.push(Edge {
            id,
            kind: classify_edge_content(&content),
            content,
            subject: Endpoint::Anchored { node: subject, point: origin },
            object: Endpoint::Free {
                point: origin.offset(NEW_EDGE_POINTER_OFFSET, NEW_EDGE_POINTER_OFFSET),
            },
            is_optional: false,
            complete: false,
        });
        self.edge_completing = true;
        tracing::debug!(edge = %id, subject = %subject, "edge started");
        self.changed();
        Ok(Some(id))
    }

    /// Moves the free endpoint of the edge being drawn. No-op without one.
    pub fn follow_pointer(&mut self, pointer: Point) {
        if !self.edge_completing {
            return;
        }
        let Some(edge) = self.edges.iter_mut().find(|e| !e.complete) else {
            return;
        };
        edge.object = Endpoint::Free { point: pointer };
        self.changed();
    }

    /// Anchors the edge being drawn to `destination`.
    ///
    /// When the segment from the subject's center to the destination's center
    /// does not cross the destination outline (for example, overlapping nodes
    /// or a self-loop) the edge stays incomplete and [`EdgeCompletion::Pending`]
    /// is returned; the caller retries on the next geometry change.
    pub fn complete_edge(&mut self, destination: NodeId) -> Result<EdgeCompletion, GraphError> {
        let (edge_id, subject_id) = {
            let edge = self.incomplete_edge().ok_or(GraphError::NoIncompleteEdge)?;
            let subject = edge.subject.node().ok_or(GraphError::NoIncompleteEdge)?;
            (edge.id, subject)
        };
        let subject = self
            .node(subject_id)
            .ok_or(GraphError::InvalidGraphReference { edge: edge_id, node: subject_id })?;
        let target = self
            .node(destination)
            .ok_or(GraphError::NodeNotFound(destination))?;

        let (subject_point, object_point) = match anchor_points(subject, target) {
            Ok(points) => points,
            Err(GeometryError::NotFound) => {
                tracing::debug!(
                    edge = %edge_id,
                    destination = %destination,
                    "no outline crossing yet"
                );
                return Ok(EdgeCompletion::Pending(edge_id));
            }
        };

        let edge = self.edge_mut(edge_id)?;
        edge.subject = Endpoint::Anchored { node: subject_id, point: subject_point };
        edge.object = Endpoint::Anchored { node: destination, point: object_point };
        edge.complete = true;
        self.edge_completing = false;
        tracing::debug!(
            edge = %edge_id,
            subject = %subject_id,
            object = %destination,
            "edge completed"
        );
        self.changed();
        Ok(EdgeCompletion::Completed(edge_id))
    }

    /// Adds a complete edge between two existing nodes in one step.
    ///
    /// Used when materializing suggestions. Overlapping nodes are anchored at their centers.
    pub fn connect(
        &mut self,
        subject: NodeId,
        object: NodeId,
        content: impl Into<String>,
    ) -> Result<EdgeId, GraphError> {
        let s = self.node(subject).ok_or(GraphError::NodeNotFound(subject))?;
        let o = self.node(object).ok_or(GraphError::NodeNotFound(object))?;
        let (subject_point, object_point) =
            anchor_points(s, o).unwrap_or((s.position, o.position));

        let content = content.into();
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.push(Edge {
            id,
            kind: classify_edge_content(&content),
            content,
            subject: Endpoint::Anchored { node: subject, point: subject_point },
            object: Endpoint::Anchored { node: object, point: object_point },
            is_optional: false,
            complete: true,
        });
        tracing::debug!(edge = %id, subject = %subject, object = %object, "edge connected");
        self.changed();
        Ok(id)
    }

    /// Replaces an edge's content and reclassifies it. Returns the new kind.
    pub fn update_edge_content(
        &mut self,
        id: EdgeId,
        content: impl Into<String>,
    ) -> Result<EdgeKind, GraphError> {
        let content = content.into();
        let kind = classify_edge_content(&content);
        let edge = self.edge_mut(id)?;
        edge.kind = kind;
        edge.content = content;
        self.changed();
        self.reselect_if(ElementRef::Edge(id));
        Ok(kind)
    }

    /// Sets optionality on an edge and both its endpoint nodes at once.
    pub fn set_optional(&mut self, id: EdgeId, value: bool) -> Result<(), GraphError> {
        let edge = self.edge(id).ok_or(GraphError::EdgeNotFound(id))?;
        let endpoints: Vec<NodeId> = [edge.subject.node(), edge.object.node()]
            .into_iter()
            .flatten()
            .collect();
        for node in &endpoints {
            if self.node(*node).is_none() {
                return Err(GraphError::InvalidGraphReference { edge: id, node: *node });
            }
        }

        self.edge_mut(id)?.is_optional = value;
        for node in self.nodes.iter_mut().filter(|n| endpoints.contains(&n.id)) {
            node.is_optional = value;
        }
        tracing::debug!(edge = %id, optional = value, "optionality set");
        self.changed();
        Ok(())
    }

    /// Removes a single edge.
    pub fn delete_edge(&mut self, id: EdgeId) -> Result<(), GraphError> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or(GraphError::EdgeNotFound(id))?;
        let edge = self.edges.remove(index);
        if !edge.complete {
            self.edge_completing = false;
        }
        if self.selection == Some(ElementRef::Edge(id)) {
            self.clear_selection();
        }
        self.changed();
        Ok(())
    }

    /// Removes everything. Ids keep counting up.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.edge_completing = false;
        self.clear_selection();
        self.changed();
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(GraphError::NodeNotFound(id))
    }

    fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge, GraphError> {
        self.edges
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(GraphError::EdgeNotFound(id))
    }

    fn describe(&self, element: ElementRef) -> Option<Selection> {
        match element {
            ElementRef::Node(id) => self.node(id).map(|n| Selection {
                element,
                content: n.content.clone(),
                kind: ElementKind::Node(n.kind),
            }),
            ElementRef::Edge(id) => self.edge(id).map(|e| Selection {
                element,
                content: e.content.clone(),
                kind: ElementKind::Edge(e.kind),
            }),
        }
    }

    /// Re-announces the selection after its content or kind changed.
    fn reselect_if(&mut self, element: ElementRef) {
        if self.selection == Some(element) {
            if let Some(selection) = self.describe(element) {
                self.emit(GraphEvent::SelectionChanged(selection));
            }
        }
    }

    /// Recomputes anchors of complete edges touching `id`. Keeps the old anchor when
    /// the outlines overlap.
    fn reanchor_edges_of(&mut self, id: NodeId) {
        let updates: Vec<(usize, Point, Point)> = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.complete && e.touches(id))
            .filter_map(|(index, e)| {
                let subject = self.node(e.subject.node()?)?;
                let object = self.node(e.object.node()?)?;
                anchor_points(subject, object)
                    .ok()
                    .map(|(s, o)| (index, s, o))
            })
            .collect();

        for (index, subject_point, object_point) in updates {
            let edge = &mut self.edges[index];
            if let Endpoint::Anchored { point, .. } = &mut edge.subject {
                *point = subject_point;
            }
            if let Endpoint::Anchored { point, .. } = &mut edge.object {
                *point = object_point;
            }
        }

        // The subject end of the edge being drawn follows its node's center.
        if let Some(position) = self.node(id).map(|n| n.position) {
            for edge in self.edges.iter_mut().filter(|e| !e.complete) {
                if let Endpoint::Anchored { node, point } = &mut edge.subject {
                    if *node == id {
                        *point = position;
                    }
                }
            }
        }
    }

    fn changed(&self) {
        self.emit(GraphEvent::GraphChanged(self.snapshot()));
    }

    fn emit(&self, event: GraphEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(ShapeConfig::default())
    }
}

/// Anchor points of an edge between two nodes: where the center-to-center
/// segment leaves the subject and where it enters the object.
fn anchor_points(subject: &Node, object: &Node) -> Result<(Point, Point), GeometryError> {
    let object_point = boundary_intersection(subject.position, object.position, &object.shape)?;
    let subject_point = boundary_intersection(object.position, subject.position, &subject.shape)
        .unwrap_or(subject.position);
    Ok((subject_point, object_point))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Point, expected: Point) {
        assert!(
            actual.distance_to(expected) < 1e-6,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn store_with_two_nodes() -> (GraphStore, NodeId, NodeId) {
        let mut store = GraphStore::default();
        let a = store.create_node(Point::new(0.0, 0.0), NodeKind::UnboundVariable, "?");
        let b = store.create_node(Point::new(300.0, 0.0), NodeKind::UnboundVariable, "?");
        (store, a, b)
    }

    #[test]
    fn test_ids_are_monotonic_and_not_reused() {
        let (mut store, a, b) = store_with_two_nodes();
        assert_eq!((a, b), (NodeId(1), NodeId(2)));
        store.delete_cascade(b).unwrap();
        let c = store.create_node(Point::new(10.0, 10.0), NodeKind::Uri, "ex:A");
        assert_eq!(c, NodeId(3));
    }

    #[test]
    fn test_free_endpoint_starts_offset() {
        let (mut store, a, _) = store_with_two_nodes();
        let edge = store.create_edge_from_existing_node(a, "?").unwrap().unwrap();
        let edge = store.edge(edge).unwrap();
        assert_eq!(edge.object, Endpoint::Free { point: Point::new(1.0, 1.0) });
        assert!(!edge.complete);
        assert!(store.edge_completing());
    }

    #[test]
    fn test_complete_edge_anchors_on_outline() {
        let (mut store, a, b) = store_with_two_nodes();
        let edge = store.create_edge_from_existing_node(a, "?").unwrap().unwrap();
        let result = store.complete_edge(b).unwrap();
        assert_eq!(result, EdgeCompletion::Completed(edge));

        let edge = store.edge(edge).unwrap();
        assert!(edge.complete);
        assert!(!store.edge_completing());
        // Variables are 80-wide circles by default.
        assert_eq!(edge.object.node(), Some(b));
        assert_eq!(edge.subject.node(), Some(a));
        assert_close(edge.object.point(), Point::new(260.0, 0.0));
        assert_close(edge.subject.point(), Point::new(40.0, 0.0));
    }

    #[test]
    fn test_self_loop_stays_pending() {
        let (mut store, a, _) = store_with_two_nodes();
        let edge = store.create_edge_from_existing_node(a, "?").unwrap().unwrap();
        assert_eq!(store.complete_edge(a).unwrap(), EdgeCompletion::Pending(edge));
        assert!(store.edge_completing());
        assert!(!store.edge(edge).unwrap().complete);
    }

    #[test]
    fn test_second_incomplete_edge_is_refused() {
        let (mut store, a, b) = store_with_two_nodes();
        store.create_edge_from_existing_node(a, "?").unwrap();
        assert_eq!(store.create_edge_from_existing_node(b, "?").unwrap(), None);
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn test_move_node_reanchors() {
        let (mut store, a, b) = store_with_two_nodes();
        let edge = store.connect(a, b, "ex:p").unwrap();
        store.move_node(b, Point::new(0.0, 300.0)).unwrap();
        let edge = store.edge(edge).unwrap();
        assert_close(edge.object.point(), Point::new(0.0, 260.0));
        assert_close(edge.subject.point(), Point::new(0.0, 40.0));
    }

    #[test]
    fn test_events_are_delivered() {
        let mut store = GraphStore::default();
        let mut rx = store.subscribe();
        let id = store.create_node(Point::new(0.0, 0.0), NodeKind::Uri, "ex:A");

        assert!(matches!(rx.try_recv(), Ok(GraphEvent::GraphChanged(s)) if s.nodes.len() == 1));
        assert!(matches!(
            rx.try_recv(),
            Ok(GraphEvent::SelectionChanged(sel)) if sel.element == ElementRef::Node(id)
        ));
    }

    #[test]
    fn test_placeholder_is_not_selected() {
        let mut store = GraphStore::default();
        store.create_node(Point::new(0.0, 0.0), NodeKind::Placeholder, "");
        assert!(store.selection().is_none());
    }

    #[test]
    fn test_click_dispatch_in_draw_mode() {
        let (mut store, a, b) = store_with_two_nodes();
        store.set_mode(CanvasMode::DrawEdge);
        let started = store.click(Point::new(0.0, 0.0), Some(a)).unwrap();
        let ClickOutcome::EdgeStarted { edge } = started else {
            panic!("expected edge start, got {started:?}");
        };
        let finished = store.click(Point::new(300.0, 0.0), Some(b)).unwrap();
        assert_eq!(finished, ClickOutcome::EdgeCompleted { edge });
    }

    #[test]
    fn test_click_places_node() {
        let mut store = GraphStore::default();
        store.set_mode(CanvasMode::PlaceNode);
        let outcome = store.click(Point::new(5.0, 5.0), None).unwrap();
        assert_eq!(outcome, ClickOutcome::NodeCreated { node: NodeId(1) });
        assert_eq!(store.node(NodeId(1)).unwrap().content, "?");
    }
}
