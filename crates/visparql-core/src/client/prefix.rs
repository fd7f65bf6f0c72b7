use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{ClientError, PrefixService};
use crate::config::PrefixServiceConfig;

/// HTTP client for the prefix resolution service.
///
/// Both endpoints take the term in the `q` query parameter and answer with
/// `{"success": bool, "value": string}`.
pub struct PrefixServiceClient {
    expand_url: String,
    shrink_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ServiceResponse {
    success: bool,
    #[serde(default)]
    value: String,
}

impl PrefixServiceClient {
    pub fn new(expand_url: impl Into<String>, shrink_url: impl Into<String>) -> Self {
        Self {
            expand_url: expand_url.into(),
            shrink_url: shrink_url.into(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &PrefixServiceConfig) -> Self {
        Self::new(config.expand_url(), config.shrink_url())
    }

    async fn call(&self, url: &str, term: &str) -> Result<String, ClientError> {
        let response = self.client.get(url).query(&[("q", term)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: ServiceResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        if body.success {
            Ok(body.value)
        } else {
            Err(ClientError::ServiceRejected(term.to_string()))
        }
    }
}

#[async_trait]
impl PrefixService for PrefixServiceClient {
    async fn expand(&self, prefixed: &str) -> Result<String, ClientError> {
        self.call(&self.expand_url, prefixed).await
    }

    async fn shrink(&self, iri: &str) -> Result<String, ClientError> {
        self.call(&self.shrink_url, iri).await
    }
}
