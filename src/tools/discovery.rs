//! Discovery tools
//!
//! Turn neural search hits into company records.

use std::sync::Arc;

use tracing::debug;

use crate::core::{Company, Result};
use crate::search::{SearchCategory, SearchHit, SearchProvider};

/// Tool finding companies by seed URL or description
#[derive(Clone)]
pub struct DiscoveryTool {
    search: Arc<dyn SearchProvider>,
}

impl DiscoveryTool {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self { search }
    }

    /// Companies similar to a known company
    pub async fn similar(&self, seed_url: &str, limit: usize) -> Result<Vec<Company>> {
        println!("\n🤖 [Search] Looking for companies similar to {}...", seed_url);
        let hits = self.search.find_similar(seed_url, limit).await?;
        Ok(Self::to_companies(hits))
    }

    /// Companies matching a free-text description
    pub async fn by_query(&self, query: &str, limit: usize) -> Result<Vec<Company>> {
        println!("\n🤖 [Search] Searching for: {}...", query);
        let hits = self
            .search
            .search(query, limit, SearchCategory::Company)
            .await?;
        Ok(Self::to_companies(hits))
    }

    fn to_companies(hits: Vec<SearchHit>) -> Vec<Company> {
        hits.into_iter()
            .map(|hit| {
                let company = Company::from_result(hit.url, hit.title);
                debug!(domain = %company.domain, url = %company.url, "Discovered company");
                println!("   Found: {} - {}", company.domain, company.title);
                company
            })
            .collect()
    }
}
