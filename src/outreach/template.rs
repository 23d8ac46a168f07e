//! Email templates
//!
//! Two passes over a template: `{column}` pulls a value from the contact
//! row, then each `{{prompt}}` is replaced by a short model-written passage
//! about the recipient.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::core::{Message, Result};
use crate::llm::{GenerateOptions, LLMProvider};
use crate::outreach::columns::{resolve_column, ContactRow};

static COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("invalid column regex"));

static PROMPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{\{(.+?)\}\}").expect("invalid prompt regex"));

const PROFILE_FIELD_LIMIT: usize = 500;
const SNIPPET_MAX_TOKENS: u32 = 500;

/// A generated email before approval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEmail {
    pub subject: String,
    pub body: String,
}

/// Replace `{column}` with the row's value, or `[Missing: column]`
///
/// Braces doubled on either side belong to a `{{prompt}}` and are left alone.
pub fn substitute_variables(template: &str, row: &ContactRow) -> String {
    COLUMN_RE
        .replace_all(template, |caps: &Captures| {
            let whole = &caps[0];
            let (start, end) = caps
                .get(0)
                .map(|m| (m.start(), m.end()))
                .unwrap_or_default();
            let doubled = template[..start].ends_with('{') || template[end..].starts_with('}');
            if doubled {
                return whole.to_string();
            }

            let column = &caps[1];
            let value = resolve_column(column, row);
            if value.is_empty() {
                format!("[Missing: {}]", column)
            } else {
                value.to_string()
            }
        })
        .into_owned()
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Profile text handed to the writer model
pub fn build_profile_context(row: &ContactRow) -> String {
    let mut parts = Vec::new();

    let name = row.first_present(&["First Name (Linkedin)", "First Name"]);
    let company = row.first_present(&["Company"]);
    let title = row.first_present(&["Title", "Job Title (Linkedin)"]);
    let headline = row.first_present(&["Headline (Linkedin)"]);

    if !name.is_empty() {
        parts.push(format!("Name: {}", name));
    }
    if !company.is_empty() {
        parts.push(format!("Company: {}", company));
    }
    if !title.is_empty() {
        parts.push(format!("Title: {}", title));
    }
    if !headline.is_empty() {
        parts.push(format!("LinkedIn Headline: {}", headline));
    }

    let description = row.first_present(&["Company Description (Linkedin)"]);
    let industry = row.first_present(&["Company Industry (Linkedin)"]);
    if !description.is_empty() {
        parts.push(format!(
            "Company Description: {}",
            truncate(description, PROFILE_FIELD_LIMIT)
        ));
    }
    if !industry.is_empty() {
        parts.push(format!("Industry: {}", industry));
    }

    let summary = row.first_present(&["summary (Linkedin)"]);
    if !summary.is_empty() {
        parts.push(format!(
            "LinkedIn Summary: {}",
            truncate(summary, PROFILE_FIELD_LIMIT)
        ));
    }

    parts.join("\n")
}

fn writer_system_prompt(profile_context: &str, email_context: &str) -> String {
    format!(
        r#"You are helping write personalized outreach emails for hackathon sponsorship.

RECIPIENT PROFILE:
{profile_context}

EMAIL TEMPLATE (for context - do not repeat information already in the email):
{email_context}

Write naturally and professionally. Keep responses concise (1-3 sentences max unless asked for more).
Do not use placeholder brackets or variables - write the actual content.
Do not repeat information that's already in the email template.
Do not be overly flattering or use excessive exclamation marks."#
    )
}

/// Take the first `subject:` line (any case) as the subject; the rest is the body
pub fn split_subject(text: &str) -> DraftEmail {
    let lines: Vec<&str> = text.trim().split('\n').collect();

    let mut subject = String::new();
    let mut body_start = 0;
    for (i, line) in lines.iter().enumerate() {
        if line.to_lowercase().starts_with("subject:") {
            subject = line.get("subject:".len()..).unwrap_or("").trim().to_string();
            body_start = i + 1;
            break;
        }
    }

    DraftEmail {
        subject,
        body: lines[body_start..].join("\n").trim().to_string(),
    }
}

/// Fills templates for one contact at a time
#[derive(Clone)]
pub struct EmailWriter {
    llm: Arc<dyn LLMProvider>,
    model: String,
}

impl EmailWriter {
    pub fn new(llm: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String> {
        println!(
            "   🤖 Generating: {}...",
            prompt.chars().take(50).collect::<String>()
        );
        let messages = [Message::system(system_prompt), Message::user(prompt)];
        let response = self
            .llm
            .chat(
                &self.model,
                &messages,
                Some(GenerateOptions::max_tokens(SNIPPET_MAX_TOKENS)),
            )
            .await?;
        Ok(response.content.trim().to_string())
    }

    /// Replace every `{{prompt}}` with a model completion, in order
    pub async fn process_llm_prompts(
        &self,
        text: &str,
        row: &ContactRow,
        original_template: &str,
    ) -> Result<String> {
        let email_context = if original_template.is_empty() {
            text
        } else {
            original_template
        };
        let system_prompt = writer_system_prompt(&build_profile_context(row), email_context);

        let prompts: Vec<(std::ops::Range<usize>, String)> = PROMPT_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let prompt = caps.get(1)?.as_str().trim().to_string();
                Some((caps.get(0)?.range(), prompt))
            })
            .collect();

        let mut output = String::with_capacity(text.len());
        let mut last = 0;
        for (range, prompt) in prompts {
            output.push_str(&text[last..range.start]);
            output.push_str(&self.complete(&prompt, &system_prompt).await?);
            last = range.end;
        }
        output.push_str(&text[last..]);

        Ok(output)
    }

    /// Produce the subject and body for one contact
    pub async fn generate_email(&self, template: &str, row: &ContactRow) -> Result<DraftEmail> {
        let substituted = substitute_variables(template, row);
        let filled = self.process_llm_prompts(&substituted, row, template).await?;
        let draft = split_subject(&filled);
        debug!(subject = %draft.subject, "Generated email");
        Ok(draft)
    }
}
