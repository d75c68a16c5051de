//! HTTP client for the Overpass interpreter endpoint.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use super::error::{excerpt, ClientError};
use super::query::QueryDocument;
use crate::config::OverpassConfig;
use crate::models::RawRecord;

/// Anything that can answer a query document with raw records.
pub trait GeodataSource {
    fn execute(
        &self,
        doc: &QueryDocument,
    ) -> impl Future<Output = std::result::Result<Vec<RawRecord>, ClientError>> + Send;
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<RawRecord>,
    /// Set by Overpass when the query ran into a runtime error or timeout
    #[serde(default)]
    remark: Option<String>,
}

/// Executes Overpass queries, one GET per call, no retries.
#[derive(Clone)]
pub struct OverpassClient {
    client: Client,
    endpoint: Url,
}

impl OverpassClient {
    pub fn new(config: &OverpassConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid Overpass endpoint {:?}", config.endpoint))?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    fn request_url(&self, doc: &QueryDocument) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("data", doc.as_str());
        url
    }
}

impl GeodataSource for OverpassClient {
    async fn execute(&self, doc: &QueryDocument) -> std::result::Result<Vec<RawRecord>, ClientError> {
        if doc.is_empty() {
            debug!("Empty query document, skipping Overpass request");
            return Ok(Vec::new());
        }

        debug!(
            "Querying {} with {} predicates",
            self.endpoint,
            doc.fragment_count()
        );

        let response = self
            .client
            .get(self.request_url(doc))
            .send()
            .await
            .map_err(|e| {
                warn!("Overpass request failed: {}", e);
                ClientError::Transport(e.without_url())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Overpass returned status {}", status);
            // body may be truncated; the status is kept regardless
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::ServiceStatus {
                status: status.as_u16(),
                excerpt: excerpt(&body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.without_url()))?;

        let parsed: OverpassResponse =
            serde_json::from_str(&body).map_err(|source| {
                warn!("Failed to parse Overpass response: {}", source);
                ClientError::MalformedBody {
                    excerpt: excerpt(&body),
                    source,
                }
            })?;

        if let Some(remark) = &parsed.remark {
            warn!("Overpass remark: {}", remark);
        }

        info!("Overpass returned {} elements", parsed.elements.len());
        Ok(parsed.elements)
    }
}
