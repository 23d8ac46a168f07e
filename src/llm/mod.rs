//! LLM module - Language Model integrations
//!
//! Provides the provider abstraction and the OpenRouter chat-completions client.

pub mod openrouter;
pub mod traits;

pub use openrouter::OpenRouterClient;
pub use traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};

/// Pull the JSON payload out of a model reply
///
/// Accepts bare JSON or JSON wrapped in a fenced code block.
pub fn extract_json(completion: &str) -> &str {
    let trimmed = completion.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }

    if let Some(inner) = trimmed.split("```").nth(1) {
        let inner = inner.trim_start();
        let inner = inner.strip_prefix("json").unwrap_or(inner);
        return inner.trim();
    }

    trimmed
}
