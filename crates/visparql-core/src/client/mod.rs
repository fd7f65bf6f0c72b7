mod error;
mod prefix;
mod results;
mod sparql;

pub use error::ClientError;
pub use prefix::PrefixServiceClient;
pub use results::{Binding, BindingValue, ResultTable, ResultsBody, ResultsHead, SparqlResults};
pub use sparql::SparqlClient;

use async_trait::async_trait;

/// A SPARQL endpoint that answers SELECT queries.
///
/// The ontology cache loads its facts through this trait and the session
/// hands compiled queries to it, so tests can substitute an in-memory store.
///
/// # Example
///
/// ```ignore
/// use visparql_core::client::{SparqlClient, TripleStore};
///
/// let store = SparqlClient::new("http://localhost:3030/ds/query");
/// let results = store.select("SELECT ?s WHERE { ?s ?p ?o } LIMIT 1").await?;
/// ```
#[async_trait]
pub trait TripleStore: Send + Sync {
    /// Runs a SELECT query and returns the parsed JSON results.
    async fn select(&self, query: &str) -> Result<SparqlResults, ClientError>;
}

/// A service that converts between prefixed names and full IRIs.
#[async_trait]
pub trait PrefixService: Send + Sync {
    /// `prefix:a` to full IRI.
    async fn expand(&self, prefixed: &str) -> Result<String, ClientError>;

    /// Full IRI to `prefix:a`.
    async fn shrink(&self, iri: &str) -> Result<String, ClientError>;
}
