//! Filename hints for saved searches

use tracing::warn;

use crate::core::Message;
use crate::llm::{GenerateOptions, LLMProvider};
use crate::session::sanitize_hint;

const NAMING_PROMPT: &str = "Generate a very short (3-5 words max) filename-safe summary of the user's search query. Use lowercase with underscores. No file extension. Example: 'developer_tools_startups' or 'cloud_api_companies'. Respond with ONLY the filename, nothing else.";

/// Hint built from the first few words of the prompt
pub fn fallback_hint(prompt: &str) -> String {
    let words: Vec<String> = prompt
        .split_whitespace()
        .take(4)
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect();
    words.join("_")
}

/// Ask the naming model for a short hint, falling back to the prompt's words
pub async fn generate_filename_hint(llm: &dyn LLMProvider, model: &str, prompt: &str) -> String {
    let messages = [Message::system(NAMING_PROMPT), Message::user(prompt)];
    match llm
        .chat(model, &messages, Some(GenerateOptions::max_tokens(50)))
        .await
    {
        Ok(response) => {
            let hint = sanitize_hint(&response.content);
            if hint.trim_matches('_').is_empty() {
                fallback_hint(prompt)
            } else {
                hint
            }
        }
        Err(e) => {
            warn!(error = %e, "Naming model failed, deriving filename locally");
            fallback_hint(prompt)
        }
    }
}
