//! Notifications sent by the graph store to its collaborators.

use serde::Serialize;

use super::model::{GraphSnapshot, Selection};

/// Events emitted by [`GraphStore`](super::GraphStore).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum GraphEvent {
    /// A node or edge became the active selection.
    SelectionChanged(Selection),
    /// Nothing is selected any more.
    SelectionCleared,
    /// The graph was mutated; carries the state after the mutation.
    GraphChanged(GraphSnapshot),
}
