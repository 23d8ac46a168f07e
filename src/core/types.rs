//! Shared types used across sponsorscout modules
//!
//! Contains message structures, tool definitions, and the company record.

use serde::{Deserialize, Serialize};

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system, tool)
    pub role: String,
    /// Content of the message
    pub content: String,
    /// Optional tool calls made by the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Id of the tool call this message answers (role "tool" only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn with_role(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role("user", content)
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role("assistant", content)
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role("system", content)
    }

    /// Create an assistant message that requests tool invocations
    pub fn assistant_tool_calls(content: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: Some(calls),
            ..Self::with_role("assistant", content)
        }
    }

    /// Create a tool result message answering `call_id`
    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(call_id.into()),
            ..Self::with_role("tool", content)
        }
    }
}

/// A tool call made by the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id, echoed back in the tool message
    pub id: String,
    /// Name of the tool to invoke
    pub name: String,
    /// JSON arguments for the tool
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Get a string argument by key
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.arguments
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Get an unsigned integer argument by key
    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.arguments
            .get(key)
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
    }
}

/// Definition of a tool that can be called by the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Type of tool (always "function" for now)
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function details
    pub function: FunctionDefinition,
}

/// Function definition within a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function
    pub name: String,
    /// Description of what the function does
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new function tool definition
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// How sure the evaluator is that a company would sponsor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

impl Confidence {
    /// Marker shown next to a company in listings
    pub fn marker(&self) -> &'static str {
        match self {
            Confidence::High => "🟢",
            Confidence::Medium => "🟡",
            Confidence::Low => "🔴",
            Confidence::Unknown => "⚪",
        }
    }
}

/// A candidate sponsor company
///
/// Every field defaults so that loosely-shaped model output still decodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

impl Company {
    /// Build a company record from a search hit
    pub fn from_result(url: impl Into<String>, title: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            domain: domain_of(&url),
            title: title.into(),
            url,
            rationale: None,
            confidence: None,
        }
    }

    /// Identity key used for deduplication
    pub fn key(&self) -> String {
        normalize_domain(&self.domain)
    }

    /// Name to search people by: the title, falling back to the domain
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.domain
        } else {
            &self.title
        }
    }
}

/// Lower-case a domain and drop a leading `www.`
pub fn normalize_domain(domain: &str) -> String {
    let lowered = domain.trim().to_lowercase();
    lowered
        .strip_prefix("www.")
        .map(str::to_string)
        .unwrap_or(lowered)
}

/// Extract the normalized host of a URL
///
/// Falls back to normalizing the raw string when it does not parse.
pub fn domain_of(raw_url: &str) -> String {
    match url::Url::parse(raw_url) {
        Ok(parsed) => parsed
            .host_str()
            .map(normalize_domain)
            .unwrap_or_default(),
        Err(_) => normalize_domain(raw_url.split('/').next().unwrap_or_default()),
    }
}

/// Keep the first company seen for each domain, preserving order
pub fn dedupe_by_domain(companies: Vec<Company>) -> Vec<Company> {
    let mut seen = std::collections::HashSet::new();
    companies
        .into_iter()
        .filter(|c| {
            let key = c.key();
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_of_strips_www_and_case() {
        assert_eq!(domain_of("https://WWW.Vercel.com/docs"), "vercel.com");
        assert_eq!(domain_of("https://supabase.com"), "supabase.com");
        assert_eq!(domain_of("fly.io/pricing"), "fly.io");
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let mut first = Company::from_result("https://vercel.com", "Vercel");
        first.rationale = Some("Hosts Next.js".to_string());
        let second = Company::from_result("https://www.vercel.com/home", "Vercel Inc");
        let other = Company::from_result("https://netlify.com", "Netlify");

        let unique = dedupe_by_domain(vec![first.clone(), second, other]);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0], first);
        assert_eq!(unique[1].domain, "netlify.com");
    }

    #[test]
    fn test_dedupe_drops_empty_domains() {
        let unique = dedupe_by_domain(vec![Company::default()]);
        assert!(unique.is_empty());
    }

    #[test]
    fn test_company_lenient_decode() {
        let company: Company =
            serde_json::from_str(r#"{"domain": "stripe.com", "confidence": "very high"}"#)
                .unwrap();
        assert_eq!(company.domain, "stripe.com");
        assert_eq!(company.title, "");
        assert_eq!(company.confidence, Some(Confidence::Unknown));
    }

    #[test]
    fn test_tool_message() {
        let msg = Message::tool("call_1", "[]");
        assert_eq!(msg.role, "tool");
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
    }
}
