//! API request and response models for the editor server.
//!
//! Graph types from `visparql_core` serialize directly; these DTOs only
//! cover request bodies and the few responses that combine several values.

use serde::{Deserialize, Serialize};

use visparql_core::graph::{CanvasMode, EdgeId, ElementRef, GraphSnapshot, NodeId, NodeKind};
use visparql_core::{Point, Selection};

// =============================================================================
// Graph
// =============================================================================

/// Full editor state for `GET /api/graph`.
#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub mode: CanvasMode,
    pub selection: Option<Selection>,
    /// True while an edge follows the pointer.
    pub edge_completing: bool,
    #[serde(flatten)]
    pub graph: GraphSnapshot,
}

/// Body of `PUT /api/mode`.
#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: CanvasMode,
}

/// Body of `POST /api/click`.
#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub x: f64,
    pub y: f64,
    /// Node under the pointer, if any.
    #[serde(default)]
    pub node: Option<NodeId>,
}

// =============================================================================
// Nodes
// =============================================================================

/// Body of `POST /api/nodes`.
#[derive(Debug, Deserialize)]
pub struct CreateNodeRequest {
    pub x: f64,
    pub y: f64,
    /// Defaults to an anonymous variable.
    #[serde(default)]
    pub content: Option<String>,
    /// Overrides classification of `content`, e.g. for placeholders.
    #[serde(default)]
    pub kind: Option<NodeKind>,
}

/// Body of `PUT /api/nodes/{id}/content` and `PUT /api/edges/{id}/content`.
#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub content: String,
}

/// Body of `PUT /api/nodes/{id}/position` and `POST /api/edges/pointer`.
#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub x: f64,
    pub y: f64,
}

impl PositionRequest {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Serialize)]
pub struct NodeCreated {
    pub node: NodeId,
    pub kind: NodeKind,
}

#[derive(Debug, Serialize)]
pub struct NodeKindResponse {
    pub kind: NodeKind,
}

#[derive(Debug, Serialize)]
pub struct NodeDeleted {
    pub node: NodeId,
    /// Edges removed along with the node.
    pub edges: Vec<EdgeId>,
}

// =============================================================================
// Edges
// =============================================================================

/// Body of `POST /api/edges`.
#[derive(Debug, Deserialize)]
pub struct StartEdgeRequest {
    pub subject: NodeId,
    #[serde(default)]
    pub content: Option<String>,
}

/// Response of `POST /api/edges`. `edge` is null when another edge is being drawn.
#[derive(Debug, Serialize)]
pub struct EdgeStarted {
    pub edge: Option<EdgeId>,
}

/// Body of `POST /api/edges/complete`.
#[derive(Debug, Deserialize)]
pub struct CompleteEdgeRequest {
    pub object: NodeId,
}

#[derive(Debug, Serialize)]
pub struct EdgeCompletionResponse {
    pub edge: EdgeId,
    /// False when the edge did not reach the node's outline and is still pending.
    pub complete: bool,
}

/// Body of `PUT /api/edges/{id}/optional`.
#[derive(Debug, Deserialize)]
pub struct OptionalRequest {
    pub optional: bool,
}

// =============================================================================
// Selection, query and ontology
// =============================================================================

/// Body of `POST /api/select`. A null element clears the selection.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    #[serde(default)]
    pub element: Option<ElementRef>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub loaded: usize,
    /// One message per skipped binding.
    pub skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
