//! Search API client: wire types, the `SearchService` seam and its HTTP implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::ApiSettings;
use super::content::{Category, CategoryResult, ResultItem};
use super::types::Engine;

/// Parameters of one category query
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub category: Category,
    /// Trimmed term; empty lists the whole catalog
    pub term: String,
    pub network: Option<String>,
    /// Comma-joined tag list
    pub tags: Option<String>,
    pub limit: u32,
    pub engine: Engine,
}

impl SearchRequest {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("category", self.category.doc_type().to_string()),
            ("q", self.term.clone()),
            ("limit", self.limit.to_string()),
            ("engine", self.engine.as_str().to_string()),
        ];
        if let Some(network) = &self.network {
            pairs.push(("network", network.clone()));
        }
        if let Some(tags) = &self.tags {
            pairs.push(("tags", tags.clone()));
        }
        pairs
    }
}

/// Envelope returned by the search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default)]
    pub message: String,
    pub data: SearchData,
}

#[derive(Debug, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub results: Vec<Value>,
    pub total: u64,
}

impl SearchData {
    /// Normalize raw records, keeping the reported total as-is
    pub fn into_category_result(self, category: Category) -> CategoryResult {
        let items = self
            .results
            .into_iter()
            .filter_map(|raw| ResultItem::from_raw(raw, category))
            .collect();
        CategoryResult::new(items, self.total)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Search API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The remote search API, one category per call
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<CategoryResult, SearchError>;
}

/// Production implementation backed by reqwest
#[derive(Clone)]
pub struct HttpSearchService {
    client: Client,
    endpoint: String,
}

impl HttpSearchService {
    pub fn new(settings: &ApiSettings) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/search", settings.base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(&self, request: &SearchRequest) -> Result<CategoryResult, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let envelope: SearchEnvelope = serde_json::from_slice(&bytes)?;
        tracing::trace!(
            message = %envelope.message,
            engine = ?envelope.data.engine,
            limit = ?envelope.data.limit,
            page = ?envelope.data.page,
            "Search envelope received"
        );
        Ok(envelope.data.into_category_result(request.category))
    }
}

#[async_trait]
impl SearchService for HttpSearchService {
    async fn search(&self, request: &SearchRequest) -> Result<CategoryResult, SearchError> {
        crate::log_api_request!(
            "search",
            category = request.category.doc_type(),
            term = %request.term,
            engine = request.engine.as_str()
        );

        let result = self.fetch(request).await;
        crate::log_api_result!(request.category.doc_type(), result);
        result
    }
}
