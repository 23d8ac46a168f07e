//! OpenRouter client implementation
//!
//! Async HTTP client for the OpenAI-compatible chat-completions API with
//! tool calling support.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::{Config, Message, Result, ScoutError, ToolCall, ToolDefinition};
use crate::llm::traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};

/// OpenRouter API client
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Chat-completions request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Message in the OpenAI wire format
#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

/// Tool call in the OpenAI wire format; arguments travel as a JSON string
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default = "function_type")]
    call_type: String,
    function: WireFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

/// Chat-completions response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl OpenRouterClient {
    /// Create a new client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.openrouter.api_key.is_empty() {
            return Err(ScoutError::MissingCredential("OPENROUTER_API_KEY"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.openrouter.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.openrouter.base_url.trim_end_matches('/').to_string(),
            api_key: config.openrouter.api_key.clone(),
        })
    }

    /// Create a client with custom base URL
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(120)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Convert internal Message to the wire format
    fn to_wire_message(msg: &Message) -> WireMessage {
        WireMessage {
            role: msg.role.clone(),
            content: Some(msg.content.clone()),
            tool_calls: msg.tool_calls.as_ref().map(|calls| {
                calls
                    .iter()
                    .map(|tc| WireToolCall {
                        id: tc.id.clone(),
                        call_type: function_type(),
                        function: WireFunction {
                            name: tc.name.clone(),
                            arguments: tc.arguments.to_string(),
                        },
                    })
                    .collect()
            }),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }

    /// Decode the JSON-string arguments of a tool call
    ///
    /// Undecodable arguments become an empty object so the tool reports the
    /// missing fields back to the model instead of aborting the loop.
    fn decode_arguments(call: &WireToolCall) -> serde_json::Value {
        if call.function.arguments.trim().is_empty() {
            return serde_json::json!({});
        }
        serde_json::from_str(&call.function.arguments).unwrap_or_else(|e| {
            warn!(tool = %call.function.name, error = %e, "Tool arguments are not valid JSON");
            serde_json::json!({})
        })
    }

    /// Convert the first choice to LLMResponse
    fn to_llm_response(response: ChatResponse) -> Result<LLMResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ScoutError::llm("Response contained no choices"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .iter()
            .map(|tc| ToolCall {
                id: tc.id.clone(),
                name: tc.function.name.clone(),
                arguments: Self::decode_arguments(tc),
            })
            .collect();

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            usage,
            model: response.model,
        })
    }

    /// Truncate long payloads for debug logs
    fn preview(content: &str) -> String {
        if content.chars().count() > 500 {
            format!("{}...", content.chars().take(500).collect::<String>())
        } else {
            content.to_string()
        }
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<LLMResponse> {
        let request_json = serde_json::to_string(request)?;
        debug!(model = request.model, body = %Self::preview(&request_json), "Chat request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ScoutError::llm(format!("Cannot connect to {}", self.base_url))
                } else {
                    ScoutError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScoutError::llm(format!(
                "Chat API error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        debug!(body = %Self::preview(&response_text), "Chat response");

        let chat_response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| ScoutError::llm(format!("Failed to parse response: {}", e)))?;

        Self::to_llm_response(chat_response)
    }
}

#[async_trait]
impl LLMProvider for OpenRouterClient {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let options = options.unwrap_or_default();
        let request = ChatRequest {
            model,
            messages: messages.iter().map(Self::to_wire_message).collect(),
            tools: None,
            tool_choice: None,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        self.send(&request).await
    }

    async fn chat_with_tools(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let options = options.unwrap_or_default();
        let request = ChatRequest {
            model,
            messages: messages.iter().map(Self::to_wire_message).collect(),
            tools: Some(tools),
            tool_choice: Some("auto"),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        self.send(&request).await
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}
