use async_trait::async_trait;
use reqwest::Client;

use super::{ClientError, SparqlResults, TripleStore};
use crate::config::{EndpointConfig, DEFAULT_RESULTS_ACCEPT};

/// HTTP client for a SPARQL query endpoint.
///
/// Queries are POSTed form-encoded in the `query` field and answered in the
/// SPARQL JSON results format.
pub struct SparqlClient {
    query_url: String,
    accept: String,
    client: Client,
}

impl SparqlClient {
    /// Creates a client for the given query endpoint.
    pub fn new(query_url: impl Into<String>) -> Self {
        Self {
            query_url: query_url.into(),
            accept: DEFAULT_RESULTS_ACCEPT.to_string(),
            client: Client::new(),
        }
    }

    /// Creates a client from endpoint configuration.
    pub fn from_config(config: &EndpointConfig) -> Self {
        Self::new(config.query_url.clone()).with_accept(config.accept.clone())
    }

    /// Sets the `Accept` header value.
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn query_url(&self) -> &str {
        &self.query_url
    }
}

#[async_trait]
impl TripleStore for SparqlClient {
    async fn select(&self, query: &str) -> Result<SparqlResults, ClientError> {
        let response = self
            .client
            .post(&self.query_url)
            .header("Accept", &self.accept)
            .form(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<SparqlResults>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_from_config() {
        let config = EndpointConfig {
            query_url: "http://triples.example/sparql".to_string(),
            accept: "application/json".to_string(),
        };
        let client = SparqlClient::from_config(&config);
        assert_eq!(client.query_url(), "http://triples.example/sparql");
        assert_eq!(client.accept, "application/json");
    }
}
