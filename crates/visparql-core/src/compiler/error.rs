use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

/// Reasons the graph cannot be turned into a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Nothing would be projected in SELECT.
    #[error("No output selected: name at least one node or property variable (for example ?x) to include it in the results")]
    NoSelectedOutputs,

    /// An edge references a node missing from the snapshot.
    #[error("Edge {edge} references missing node {node}")]
    InvalidGraphReference { edge: EdgeId, node: NodeId },
}
