//! Google Sheets v4 values API backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::core::{Config, Result, ScoutError};
use crate::pipeline::sheet::{Sheet, Table};

/// Sheets API client bound to one spreadsheet
#[derive(Clone)]
pub struct GoogleSheetsClient {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl GoogleSheetsClient {
    /// Create a new client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.sheets.access_token.is_empty() {
            return Err(ScoutError::MissingCredential("GOOGLE_SHEETS_ACCESS_TOKEN"));
        }
        if config.sheets.spreadsheet_id.is_empty() {
            return Err(ScoutError::MissingCredential("SPONSOR_SPREADSHEET_ID"));
        }
        Self::with_base_url(
            &config.sheets.base_url,
            &config.sheets.spreadsheet_id,
            &config.sheets.access_token,
        )
    }

    /// Create a client with custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        })
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}` with the range escaped
    fn values_url(&self, range: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ScoutError::config(format!("Invalid Sheets base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ScoutError::config("Sheets base URL cannot be a base"))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", &self.spreadsheet_id, "values", range]);
        Ok(url)
    }

    async fn check(response: Response, action: &str, tab: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        Err(ScoutError::sheet(format!(
            "Sheets {} of '{}' failed ({}): {}",
            action, tab, status, error_text
        )))
    }
}

#[async_trait]
impl Sheet for GoogleSheetsClient {
    async fn read(&self, tab: &str) -> Result<Table> {
        let response = self
            .client
            .get(self.values_url(tab)?)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let response = Self::check(response, "read", tab).await?;

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| ScoutError::sheet(format!("Failed to parse Sheets response: {}", e)))?;

        debug!(tab, rows = range.values.len(), "Read sheet tab");
        Ok(Table::from_values(
            range
                .values
                .into_iter()
                .map(|row| row.into_iter().map(cell_text).collect())
                .collect(),
        ))
    }

    async fn write(&self, tab: &str, table: &Table) -> Result<()> {
        let range = format!("{}!A1", tab);
        let mut url = self.values_url(&range)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = ValueRangeBody {
            range: &range,
            major_dimension: "ROWS",
            values: table.to_values(),
        };
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check(response, "write", tab).await?;

        debug!(tab, rows = table.rows.len(), "Wrote sheet tab");
        Ok(())
    }

    async fn clear(&self, tab: &str) -> Result<()> {
        let url = self.values_url(&format!("{}:clear", tab))?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::check(response, "clear", tab).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "google"
    }
}
