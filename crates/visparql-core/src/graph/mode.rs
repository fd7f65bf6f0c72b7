use serde::{Deserialize, Serialize};

use super::model::{EdgeId, NodeId};

/// Governs what a click on the canvas does.
///
/// Modes change only through explicit user selection:
/// Drag ⇄ PlaceNode ⇄ DrawEdge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasMode {
    /// Clicking a node selects it; nodes can be moved.
    #[default]
    Drag,
    /// Clicking empty canvas places a new variable node.
    PlaceNode,
    /// Clicking a node starts an edge, or completes the pending one.
    DrawEdge,
}

impl CanvasMode {
    /// Returns a human-readable name for the mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            CanvasMode::Drag => "Drag",
            CanvasMode::PlaceNode => "Place node",
            CanvasMode::DrawEdge => "Draw edge",
        }
    }
}

/// What a canvas click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClickOutcome {
    NodeCreated { node: NodeId },
    NodeSelected { node: NodeId },
    EdgeStarted { edge: EdgeId },
    EdgeCompleted { edge: EdgeId },
    /// The pending edge did not reach the clicked node's outline yet.
    EdgePending { edge: EdgeId },
    Ignored,
}
