//! Chat refinement of a saved company list
//!
//! The operator describes a change in plain words; the model returns the
//! whole modified list. Annotations the model forgot for companies it kept
//! are restored from the previous list.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::{dedupe_by_domain, Company, Message, Result, ScoutError};
use crate::llm::{extract_json, GenerateOptions, LLMProvider};
use crate::session::{Session, TranscriptEntry};

/// The model's answer to one refinement instruction
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    pub companies: Vec<Company>,
    pub changes_made: String,
    /// The operator asked for companies the list doesn't have yet
    pub should_search_more: bool,
}

#[derive(Debug, Deserialize)]
struct RawRefinement {
    companies: Option<Vec<Company>>,
    changes_made: Option<String>,
    #[serde(default)]
    should_search_more: bool,
}

/// Build the refinement prompt
pub fn build_prompt(user_prompt: &str, companies: &[Company], instruction: &str) -> String {
    let company_list = companies
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let rationale: String = c
                .rationale
                .as_deref()
                .unwrap_or("No rationale")
                .chars()
                .take(50)
                .collect();
            format!("{}. {}: {} - {}", i + 1, c.domain, c.title, rationale)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are helping refine a list of potential hackathon sponsor companies.

Original search: {user_prompt}

Current company list:
{company_list}

User's modification request: {instruction}

Apply the user's requested changes to the list. Return a JSON object with:
{{
  "companies": [... the modified list, each with domain, title, url, rationale, confidence ...],
  "changes_made": "Brief description of what you changed",
  "should_search_more": true/false (if user asked to add more companies)
}}

IMPORTANT:
- If user asks to remove companies, remove them from the list
- If user asks to keep only certain types, filter accordingly
- If user asks to add more, set should_search_more to true
- Preserve the original rationale/confidence for companies you keep
- Return ONLY the JSON, no other text."#
    )
}

/// Restore rationale and confidence the model dropped for kept companies
pub fn carry_forward(previous: &[Company], refined: Vec<Company>) -> Vec<Company> {
    let known: HashMap<String, &Company> = previous.iter().map(|c| (c.key(), c)).collect();

    refined
        .into_iter()
        .map(|mut company| {
            if let Some(old) = known.get(&company.key()) {
                if company.rationale.is_none() {
                    company.rationale = old.rationale.clone();
                }
                if company.confidence.is_none() {
                    company.confidence = old.confidence;
                }
                if company.title.is_empty() {
                    company.title = old.title.clone();
                }
                if company.url.is_empty() {
                    company.url = old.url.clone();
                }
            }
            company
        })
        .collect()
}

/// Parse the model's reply against the list it was given
///
/// A missing `companies` key keeps the previous list. Anything that isn't
/// the expected JSON object is an error and leaves the caller's list alone.
pub fn parse_refinement(reply: &str, previous: &[Company]) -> Result<Refinement> {
    let raw: RawRefinement = serde_json::from_str(extract_json(reply))
        .map_err(|e| ScoutError::malformed(format!("Error processing request: {}", e)))?;

    let companies = match raw.companies {
        Some(companies) => dedupe_by_domain(carry_forward(previous, companies)),
        None => previous.to_vec(),
    };

    Ok(Refinement {
        companies,
        changes_made: raw.changes_made.unwrap_or_else(|| "No changes".to_string()),
        should_search_more: raw.should_search_more,
    })
}

/// Applies refinement instructions to a session
#[derive(Clone)]
pub struct Refiner {
    llm: Arc<dyn LLMProvider>,
    model: String,
    max_tokens: u32,
}

impl Refiner {
    pub fn new(llm: Arc<dyn LLMProvider>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            llm,
            model: model.into(),
            max_tokens,
        }
    }

    /// Ask the model to apply `instruction` to the current list
    pub async fn refine(
        &self,
        user_prompt: &str,
        companies: &[Company],
        instruction: &str,
    ) -> Result<Refinement> {
        debug!(count = companies.len(), instruction, "Refining company list");
        let messages = [Message::user(build_prompt(user_prompt, companies, instruction))];
        let response = self
            .llm
            .chat(
                &self.model,
                &messages,
                Some(GenerateOptions::max_tokens(self.max_tokens)),
            )
            .await?;

        parse_refinement(&response.content, companies).inspect_err(|e| {
            warn!(error = %e, "Refinement reply was not usable");
        })
    }

    /// Refine the session in place and record the exchange in its transcript
    ///
    /// On error the session is left untouched.
    pub async fn apply(&self, session: &mut Session, instruction: &str) -> Result<Refinement> {
        let refinement = self
            .refine(&session.initial_prompt, &session.companies, instruction)
            .await?;

        session.companies = refinement.companies.clone();
        session.company_count = session.companies.len();
        session
            .conversation
            .push(TranscriptEntry::user(instruction));
        session
            .conversation
            .push(TranscriptEntry::assistant(refinement.changes_made.clone()));

        Ok(refinement)
    }
}
