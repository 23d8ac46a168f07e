//! Search module - neural web search integrations
//!
//! Discovery and contact enrichment only need ranked `{url, title}` hits,
//! which the `SearchProvider` trait captures.

pub mod exa;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::Result;

pub use exa::ExaClient;

/// Which index a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    /// Company home pages
    Company,
    /// People profiles
    People,
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
}

impl SearchHit {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Trait for search backends
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Free-text search within a category
    async fn search(
        &self,
        query: &str,
        limit: usize,
        category: SearchCategory,
    ) -> Result<Vec<SearchHit>>;

    /// Companies similar to the page at `seed_url`, excluding its own domain
    async fn find_similar(&self, seed_url: &str, limit: usize) -> Result<Vec<SearchHit>>;

    /// Get the provider name
    fn name(&self) -> &str;
}
