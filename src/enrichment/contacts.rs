//! LinkedIn contact discovery
//!
//! Runs role-targeted people searches for each approved company and keeps
//! the LinkedIn profile hits.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::config::EnrichmentConfig;
use crate::core::{Company, Result};
use crate::search::{SearchCategory, SearchProvider};

const PROFILE_MARKER: &str = "linkedin.com/in/";

/// A person worth contacting about sponsorship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "LinkedIn")]
    pub linkedin: String,
    /// Never known from a profile search
    #[serde(rename = "Email")]
    pub email: String,
}

/// People searches issued for one company, in order
pub fn role_queries(company_name: &str) -> [String; 5] {
    [
        format!("{} Developer Relations DevRel", company_name),
        format!("{} Developer Advocate", company_name),
        format!("{} University Recruiter Campus Recruiter", company_name),
        format!("{} CTO CEO Founder", company_name),
        format!("{} Partnerships Sponsorships", company_name),
    ]
}

/// Split a profile page title like `"Ada Lovelace - Developer Advocate - Acme"`
/// into a name and a role
pub fn parse_profile_title(title: &str) -> (String, String) {
    let mut parts = title.split(" - ").map(str::trim);
    let name = parts
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown")
        .to_string();
    let role = parts
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown Role")
        .to_string();
    (name, role)
}

/// Contact finder over a people search backend
pub struct ContactFinder<'a> {
    search: &'a dyn SearchProvider,
    settings: &'a EnrichmentConfig,
}

impl<'a> ContactFinder<'a> {
    pub fn new(search: &'a dyn SearchProvider, settings: &'a EnrichmentConfig) -> Self {
        Self { search, settings }
    }

    /// LinkedIn profiles for one company, unique by URL
    ///
    /// A failed query is logged and skipped.
    pub async fn find_linkedin_contacts(&self, company_name: &str, domain: &str) -> Vec<Contact> {
        println!("🔎 Searching LinkedIn for contacts at {}...", company_name);

        let mut seen = HashSet::new();
        let mut contacts = Vec::new();

        for query in role_queries(company_name) {
            match self
                .search
                .search(&query, self.settings.results_per_query, SearchCategory::People)
                .await
            {
                Ok(hits) => {
                    for hit in hits {
                        debug!(url = %hit.url, title = %hit.title, "People result");
                        if !hit.url.contains(PROFILE_MARKER) || !seen.insert(hit.url.clone()) {
                            continue;
                        }
                        let (name, title) = parse_profile_title(&hit.title);
                        contacts.push(Contact {
                            company: company_name.to_string(),
                            domain: domain.to_string(),
                            name,
                            title,
                            linkedin: hit.url,
                            email: String::new(),
                        });
                    }
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "People search failed");
                    println!("   ⚠️ Search error: {}", e);
                }
            }

            pause(self.settings.query_delay_ms).await;
        }

        contacts
    }

    /// Contacts for every company that has a domain
    pub async fn enrich_companies(&self, companies: &[Company]) -> Vec<Contact> {
        let mut all = Vec::new();

        for company in companies.iter().filter(|c| !c.domain.is_empty()) {
            let name = company.display_name();
            let contacts = self.find_linkedin_contacts(name, &company.domain).await;
            if contacts.is_empty() {
                println!("   ⚠️  No LinkedIn profiles found for {}", name);
            } else {
                println!("   ✅ Found {} contacts at {}", contacts.len(), name);
                all.extend(contacts);
            }

            pause(self.settings.company_delay_ms).await;
        }

        all
    }
}

async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Write contacts with the `Company,Domain,Name,Title,LinkedIn,Email` header
pub fn write_contacts_csv(path: &Path, contacts: &[Contact]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for contact in contacts {
        writer.serialize(contact)?;
    }
    writer.flush()?;
    Ok(())
}
