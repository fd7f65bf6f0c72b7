//! Ontology loading error types.

use thiserror::Error;

use crate::client::ClientError;

/// Errors raised while loading the ontology.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// The triple store could not be queried.
    #[error("Ontology load failed: {0}")]
    LoadFailure(#[from] ClientError),

    /// A domain/range binding lacks a required variable. Skipped, never fatal.
    #[error("Binding {index} is missing ?{missing}")]
    MalformedBinding { index: usize, missing: &'static str },
}
