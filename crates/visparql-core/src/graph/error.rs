//! Graph store error types.

use thiserror::Error;

use super::model::{EdgeId, NodeId};

/// Errors returned by graph store mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// No node with this id exists.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// No edge with this id exists.
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// An edge completion was requested but no edge is being drawn.
    #[error("No edge is being drawn")]
    NoIncompleteEdge,

    /// An edge references a node missing from the graph. Internal consistency fault.
    #[error("Edge {edge} references missing node {node}")]
    InvalidGraphReference { edge: EdgeId, node: NodeId },

    /// More than one edge is incomplete. Internal consistency fault.
    #[error("{0} edges are incomplete; at most one may be drawn at a time")]
    TooManyIncompleteEdges(usize),
}
