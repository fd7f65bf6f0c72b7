//! Node and edge types of the query graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ShapeConfig;
use crate::geometry::{Point, Shape};

/// Identifier of a node. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an edge. Separate namespace from [`NodeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u32);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a node stands for in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A variable not projected in SELECT.
    UnboundVariable,
    /// A variable marked for output.
    SelectedVariable,
    /// A concrete IRI, prefixed or full.
    Uri,
    /// A literal in its lexical form.
    Literal,
    /// A variable whose class was inferred from several candidate ranges.
    Amalgam,
    /// An anchor stub whose type the user has not chosen yet.
    Placeholder,
}

impl NodeKind {
    /// True for kinds that compile to a SPARQL variable.
    pub fn is_variable(self) -> bool {
        matches!(
            self,
            Self::UnboundVariable | Self::SelectedVariable | Self::Amalgam | Self::Placeholder
        )
    }

    /// Outline of a node of this kind centered on `center`.
    pub fn shape(self, center: Point, shapes: &ShapeConfig) -> Shape {
        match self {
            Self::UnboundVariable | Self::SelectedVariable | Self::Amalgam => Shape::rounded(
                center,
                shapes.node_size,
                shapes.node_size,
                shapes.variable_corner_radius,
            ),
            Self::Uri => Shape::rounded(
                center,
                shapes.node_size,
                shapes.node_size,
                shapes.uri_corner_radius,
            ),
            Self::Literal => Shape::rect(center, shapes.literal_width, shapes.literal_height),
            Self::Placeholder => Shape::circle(center, shapes.placeholder_size),
        }
    }
}

/// What an edge stands for in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// A known property IRI.
    BoundProperty,
    /// A property variable.
    UnboundProperty,
}

/// A vertex of the query graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub content: String,
    /// Center of the shape.
    pub position: Point,
    /// Outline derived from `kind`.
    pub shape: Shape,
    pub is_optional: bool,
    /// Class label inferred from the ontology, if any.
    pub inferred_class: Option<String>,
}

impl Node {
    /// True if the node is projected in SELECT.
    pub fn is_selected(&self) -> bool {
        self.kind == NodeKind::SelectedVariable
    }
}

/// One end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Endpoint {
    /// Bound to a node, touching its outline at `point`.
    Anchored { node: NodeId, point: Point },
    /// Following the pointer while the edge is drawn.
    Free { point: Point },
}

impl Endpoint {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Anchored { node, .. } => Some(*node),
            Self::Free { .. } => None,
        }
    }

    pub fn point(&self) -> Point {
        match self {
            Self::Anchored { point, .. } | Self::Free { point } => *point,
        }
    }
}

/// A directed property relation between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub kind: EdgeKind,
    pub content: String,
    pub subject: Endpoint,
    pub object: Endpoint,
    pub is_optional: bool,
    /// False while the object endpoint still follows the pointer.
    pub complete: bool,
}

impl Edge {
    /// True if the edge is projected in SELECT: a named property variable.
    pub fn is_selected(&self) -> bool {
        self.kind == EdgeKind::UnboundProperty && self.content.len() > 1
    }

    /// True if either endpoint is anchored to `node`.
    pub fn touches(&self, node: NodeId) -> bool {
        self.subject.node() == Some(node) || self.object.node() == Some(node)
    }
}

/// Reference to the element a collaborator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ElementRef {
    Node(NodeId),
    Edge(EdgeId),
}

/// Kind of the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementKind {
    Node(NodeKind),
    Edge(EdgeKind),
}

/// The active selection as seen by collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub element: ElementRef,
    pub content: String,
    pub kind: ElementKind,
}

/// An immutable copy of the graph, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }
}
