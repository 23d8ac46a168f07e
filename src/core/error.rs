//! Custom error types for sponsorscout
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for sponsorscout operations
#[derive(Error, Debug)]
pub enum ScoutError {
    /// Chat-completions API errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Neural search API errors
    #[error("Search error: {0}")]
    Search(String),

    /// Transactional mail API errors
    #[error("Mail error: {0}")]
    Mail(String),

    /// Spreadsheet backend errors
    #[error("Sheet error: {0}")]
    Sheet(String),

    /// Session file errors
    #[error("Session error: {0}")]
    Session(String),

    /// Tool execution errors
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The model replied with something that could not be decoded
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// A required API key is not set
    #[error("{0} is not set. Add it to your environment or .env file")]
    MissingCredential(&'static str),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for sponsorscout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

impl ScoutError {
    /// Create an LLM error
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Create a search error
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Create a mail error
    pub fn mail(msg: impl Into<String>) -> Self {
        Self::Mail(msg.into())
    }

    /// Create a sheet error
    pub fn sheet(msg: impl Into<String>) -> Self {
        Self::Sheet(msg.into())
    }

    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a tool execution error
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Wrap an error with additional context
    pub fn with_context<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_constructors() {
        assert_eq!(
            ScoutError::search("quota exceeded").to_string(),
            "Search error: quota exceeded"
        );
        assert_eq!(
            ScoutError::MissingCredential("EXA_API_KEY").to_string(),
            "EXA_API_KEY is not set. Add it to your environment or .env file"
        );
    }

    #[test]
    fn test_with_context() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ScoutError::with_context("Reading searches/a.json", io);
        assert_eq!(err.to_string(), "Reading searches/a.json: gone");
    }
}
