//! Mailgun template messages

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::core::{Config, Result, ScoutError};

/// Mailgun API client for one sending domain
#[derive(Clone)]
pub struct MailgunClient {
    client: Client,
    base_url: String,
    domain: String,
    api_key: String,
    sender_name: String,
    subject: String,
}

impl MailgunClient {
    /// Create a new client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let mailgun = &config.mailgun;
        if mailgun.api_key.is_empty() {
            return Err(ScoutError::MissingCredential("MAILGUN_API_KEY"));
        }
        if mailgun.domain.is_empty() {
            return Err(ScoutError::MissingCredential("MAILGUN_DOMAIN"));
        }

        let mut client = Self::with_base_url(&mailgun.base_url, &mailgun.domain, &mailgun.api_key)?;
        client.sender_name = mailgun.sender_name.clone();
        client.subject = mailgun.subject.clone();
        Ok(client)
    }

    /// Create a client with custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        domain: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            domain: domain.into(),
            api_key: api_key.into(),
            sender_name: "Scotty Labs".to_string(),
            subject: "Hello from Scottylabs!".to_string(),
        })
    }

    /// `From` header value
    pub fn sender(&self) -> String {
        format!("{} <mailgun@{}>", self.sender_name, self.domain)
    }

    /// Send one templated message to every recipient
    ///
    /// Returns the HTTP status; a non-success status is not an error here
    /// since callers report it to the operator.
    pub async fn send_template(&self, recipients: &[String], template: &str) -> Result<u16> {
        let mut form: Vec<(&str, String)> = vec![("from", self.sender())];
        form.extend(recipients.iter().map(|r| ("to", r.clone())));
        form.push(("subject", self.subject.clone()));
        form.push(("template", template.to_string()));

        debug!(
            recipients = recipients.len(),
            template, "Sending Mailgun template message"
        );

        let response = self
            .client
            .post(format!("{}/v3/{}/messages", self.base_url, self.domain))
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(500)
                .collect();
            warn!(status = %status, body = %body, "Mailgun rejected message");
        }

        Ok(status.as_u16())
    }
}
