//! Exa neural search client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::core::{Config, Result, ScoutError};
use crate::search::{SearchCategory, SearchHit, SearchProvider};

/// Exa API client
#[derive(Clone)]
pub struct ExaClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    num_results: usize,
    #[serde(rename = "type")]
    search_type: &'static str,
    category: SearchCategory,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FindSimilarRequest<'a> {
    url: &'a str,
    num_results: usize,
    exclude_source_domain: bool,
    category: SearchCategory,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ExaResult>,
}

#[derive(Debug, Deserialize)]
struct ExaResult {
    url: String,
    #[serde(default)]
    title: Option<String>,
}

impl ExaClient {
    /// Create a new client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.exa.api_key.is_empty() {
            return Err(ScoutError::MissingCredential("EXA_API_KEY"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.exa.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.exa.base_url.trim_end_matches('/').to_string(),
            api_key: config.exa.api_key.clone(),
        })
    }

    /// Create a client with custom base URL
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn post<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, endpoint))
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScoutError::search(format!(
                "Exa {} failed ({}): {}",
                endpoint, status, error_text
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ScoutError::search(format!("Failed to parse Exa response: {}", e)))?;

        debug!(endpoint, results = parsed.results.len(), "Exa search complete");

        Ok(parsed
            .results
            .into_iter()
            .map(|r| SearchHit::new(r.url, r.title.unwrap_or_default()))
            .collect())
    }
}

#[async_trait]
impl SearchProvider for ExaClient {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        category: SearchCategory,
    ) -> Result<Vec<SearchHit>> {
        let request = SearchRequest {
            query,
            num_results: limit,
            search_type: "neural",
            category,
        };
        self.post("search", &request).await
    }

    async fn find_similar(&self, seed_url: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let request = FindSimilarRequest {
            url: seed_url,
            num_results: limit,
            exclude_source_domain: true,
            category: SearchCategory::Company,
        };
        self.post("findSimilar", &request).await
    }

    fn name(&self) -> &str {
        "exa"
    }
}
