//! Scripted backends shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use sponsorscout::core::{Message, Result, ScoutError, ToolCall, ToolDefinition};
use sponsorscout::llm::{GenerateOptions, LLMProvider, LLMResponse};
use sponsorscout::search::{SearchCategory, SearchHit, SearchProvider};

/// LLM that replays queued responses
///
/// Tool-calling requests pop from `agent_turns` (an empty queue ends the
/// loop with a plain summary). Plain chat requests pop from `replies`.
#[derive(Default)]
pub struct ScriptedLlm {
    agent_turns: Mutex<VecDeque<LLMResponse>>,
    replies: Mutex<VecDeque<String>>,
    /// Messages sent with every tool-calling request
    pub agent_requests: Mutex<Vec<Vec<Message>>>,
    /// Last user message of every plain chat request
    pub chat_prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent_turn(self, response: LLMResponse) -> Self {
        self.agent_turns.lock().unwrap().push_back(response);
        self
    }

    pub fn reply(self, content: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(content.into());
        self
    }
}

#[async_trait]
impl LLMProvider for ScriptedLlm {
    async fn chat(
        &self,
        _model: &str,
        messages: &[Message],
        _options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        if let Some(last) = messages.iter().rev().find(|m| m.role == "user") {
            self.chat_prompts.lock().unwrap().push(last.content.clone());
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .map(LLMResponse::text)
            .ok_or_else(|| ScoutError::llm("no scripted reply left"))
    }

    async fn chat_with_tools(
        &self,
        _model: &str,
        messages: &[Message],
        _tools: &[ToolDefinition],
        _options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        self.agent_requests.lock().unwrap().push(messages.to_vec());
        Ok(self
            .agent_turns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| LLMResponse::text("Done.")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Search backend with fixed answers
#[derive(Default)]
pub struct StaticSearch {
    pub by_query: Vec<SearchHit>,
    pub similar: Vec<SearchHit>,
    pub people: Vec<SearchHit>,
    pub fail: bool,
    /// Every query or seed URL received
    pub requests: Mutex<Vec<String>>,
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        category: SearchCategory,
    ) -> Result<Vec<SearchHit>> {
        self.requests.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(ScoutError::search("Exa search failed (500): boom"));
        }
        let hits = match category {
            SearchCategory::Company => &self.by_query,
            SearchCategory::People => &self.people,
        };
        Ok(hits.iter().take(limit).cloned().collect())
    }

    async fn find_similar(&self, seed_url: &str, limit: usize) -> Result<Vec<SearchHit>> {
        self.requests.lock().unwrap().push(seed_url.to_string());
        if self.fail {
            return Err(ScoutError::search("Exa findSimilar failed (500): boom"));
        }
        Ok(self.similar.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}

pub fn call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall::new(id, name, arguments)
}
