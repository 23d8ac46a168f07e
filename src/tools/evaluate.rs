//! Evaluate tool
//!
//! Lets the agent hand its discoveries to the evaluator model and read back
//! which ones survived.

use std::sync::Arc;

use crate::agent::evaluator::{self, Evaluation};
use crate::core::{Company, Result, ToolCall};
use crate::llm::LLMProvider;

/// Tool judging discovered companies
#[derive(Clone)]
pub struct EvaluateTool {
    llm: Arc<dyn LLMProvider>,
    model: String,
    max_tokens: u32,
}

impl EvaluateTool {
    pub fn new(llm: Arc<dyn LLMProvider>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            llm,
            model: model.into(),
            max_tokens,
        }
    }

    /// Companies listed in the call's `companies` argument
    ///
    /// Entries that are not objects are skipped.
    pub fn companies_from(tool_call: &ToolCall) -> Vec<Company> {
        tool_call
            .arguments
            .get("companies")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Run the evaluator over the call's companies
    pub async fn execute(&self, tool_call: &ToolCall, user_prompt: &str) -> Result<Evaluation> {
        let companies = Self::companies_from(tool_call);
        println!("   Evaluating {} companies...", companies.len());
        let evaluation = evaluator::evaluate(
            self.llm.as_ref(),
            &self.model,
            self.max_tokens,
            user_prompt,
            &companies,
        )
        .await?;

        print_evaluation(&evaluation);
        Ok(evaluation)
    }
}

/// Show approvals and grouped rejection reasons to the operator
fn print_evaluation(evaluation: &Evaluation) {
    if evaluation.approved.is_empty() && evaluation.rejected.is_empty() {
        println!("\n❌ {}", evaluation.feedback);
        return;
    }

    println!("\n✅ Approved {} companies:", evaluation.approved.len());
    for company in &evaluation.approved {
        let marker = company.confidence.map(|c| c.marker()).unwrap_or("⚪");
        let rationale: String = company
            .rationale
            .as_deref()
            .unwrap_or("No rationale")
            .chars()
            .take(50)
            .collect();
        println!("   {} {}: {}...", marker, company.domain, rationale);
    }

    if evaluation.rejected.is_empty() {
        return;
    }

    println!("\n❌ Rejected {} companies:", evaluation.rejected.len());
    let mut reasons: Vec<(&str, Vec<&str>)> = Vec::new();
    for rejection in &evaluation.rejected {
        let reason = if rejection.reason.is_empty() {
            "Unknown reason"
        } else {
            rejection.reason.as_str()
        };
        match reasons.iter_mut().find(|entry| entry.0 == reason) {
            Some((_, domains)) => domains.push(rejection.domain.as_str()),
            None => reasons.push((reason, vec![rejection.domain.as_str()])),
        }
    }
    for (reason, domains) in reasons {
        let shown = domains.iter().take(3).copied().collect::<Vec<_>>().join(", ");
        let more = if domains.len() > 3 { "..." } else { "" };
        println!("   • {}: {}{}", reason, shown, more);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_companies_from_arguments() {
        let call = ToolCall::new(
            "c1",
            "evaluate_companies",
            json!({"companies": [
                {"domain": "vercel.com", "title": "Vercel", "url": "https://vercel.com"},
                "netlify.com",
                {"domain": "render.com"}
            ]}),
        );
        let companies = EvaluateTool::companies_from(&call);
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[1].domain, "render.com");
    }

    #[test]
    fn test_missing_companies_argument() {
        let call = ToolCall::new("c1", "evaluate_companies", json!({}));
        assert!(EvaluateTool::companies_from(&call).is_empty());
    }
}
