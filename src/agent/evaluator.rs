//! Company evaluator
//!
//! Asks the evaluator model which discovered companies are credible sponsor
//! targets. Replies that are not JSON degrade to an empty approval list with
//! an explanatory feedback string rather than an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{Company, Message, Result};
use crate::llm::{extract_json, GenerateOptions, LLMProvider};

/// A company the evaluator turned down
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rejection {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub reason: String,
}

/// Outcome of one evaluation batch
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    pub approved: Vec<Company>,
    pub rejected: Vec<Rejection>,
    pub feedback: String,
}

impl Evaluation {
    /// An evaluation that approved nothing, explaining why
    pub fn empty(feedback: impl Into<String>) -> Self {
        Self {
            approved: Vec::new(),
            rejected: Vec::new(),
            feedback: feedback.into(),
        }
    }
}

/// Build the evaluation prompt for a batch
pub fn build_prompt(user_prompt: &str, companies: &[Company]) -> String {
    let company_list = companies
        .iter()
        .map(|c| {
            format!(
                "- {}: {} ({})",
                if c.domain.is_empty() { "unknown" } else { &c.domain },
                if c.title.is_empty() { "Unknown" } else { &c.title },
                c.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"The user is looking for: {user_prompt}

Here is a list of companies that were found:
{company_list}

For each company, evaluate whether it's a good fit for the user's request.

IMPORTANT RULES:
1. EXCLUDE any company you don't recognize or haven't heard of
2. EXCLUDE hackathon websites/platforms (like devpost, hackathon.io, mlh.io)
3. EXCLUDE other hackathons (like VTHacks, HackPSU, etc.)
4. For each company you KEEP, provide a short rationale

Respond with a JSON object with two arrays:
{{
  "approved": [
    {{
      "domain": "example.com",
      "title": "Example Company",
      "url": "https://example.com",
      "rationale": "Why this company is a good fit (1-2 sentences)",
      "confidence": "high" | "medium" | "low"
    }}
  ],
  "rejected": [
    {{
      "domain": "bad.com",
      "reason": "Why this was rejected (e.g., 'Unknown company', 'This is a hackathon platform', 'This is another hackathon')"
    }}
  ]
}}

Respond with ONLY the JSON object, no other text."#
    )
}

/// Decode an array field element by element, dropping entries that don't fit
fn decode_items<T: serde::de::DeserializeOwned>(value: Option<&serde_json::Value>) -> Vec<T> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Summarize approvals and rejection patterns for the agent
pub fn summarize(approved: usize, rejected: &[Rejection]) -> String {
    let mut feedback = format!(
        "Approved {} companies, rejected {}.",
        approved,
        rejected.len()
    );

    let mentions = |needles: &[&str]| {
        rejected
            .iter()
            .filter(|r| {
                let reason = r.reason.to_lowercase();
                needles.iter().any(|n| reason.contains(n))
            })
            .count()
    };

    let unknown = mentions(&["unknown", "recognize"]);
    let platforms = mentions(&["platform", "hackathon"]);

    if unknown > 0 {
        feedback.push_str(&format!(
            " {} were unknown companies - try searching for more well-known companies.",
            unknown
        ));
    }
    if platforms > 0 {
        feedback.push_str(&format!(
            " {} were hackathon platforms/events - we want sponsors, not platforms.",
            platforms
        ));
    }

    feedback
}

/// Parse the evaluator's reply
pub fn parse_evaluation(reply: &str) -> Evaluation {
    let value: serde_json::Value = match serde_json::from_str(extract_json(reply)) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Evaluator reply is not JSON");
            return Evaluation::empty(format!("Error evaluating companies: {}", e));
        }
    };

    let approved: Vec<Company> = decode_items(value.get("approved"));
    let rejected: Vec<Rejection> = decode_items(value.get("rejected"));
    let feedback = summarize(approved.len(), &rejected);

    Evaluation {
        approved,
        rejected,
        feedback,
    }
}

/// Evaluate a batch of discovered companies against the user's request
pub async fn evaluate(
    llm: &dyn LLMProvider,
    model: &str,
    max_tokens: u32,
    user_prompt: &str,
    companies: &[Company],
) -> Result<Evaluation> {
    if companies.is_empty() {
        return Ok(Evaluation::empty("No companies to evaluate."));
    }

    debug!(count = companies.len(), "Evaluating companies");

    let messages = vec![Message::user(build_prompt(user_prompt, companies))];
    let response = llm
        .chat(model, &messages, Some(GenerateOptions::max_tokens(max_tokens)))
        .await?;

    Ok(parse_evaluation(&response.content))
}
