//! Conversation history management
//!
//! Holds the message list sent to the model on every round. Tool call
//! requests and their answers must stay paired, so nothing is evicted.

use crate::core::Message;

/// Manages conversation history
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    /// Message history
    messages: Vec<Message>,
    /// System prompt (always first)
    system_prompt: Option<String>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation led by a system prompt
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: Some(prompt.into()),
        }
    }

    /// Add a user message
    pub fn add_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    /// Add an assistant message
    pub fn add_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    /// Add any message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Get all messages including system prompt
    pub fn get_messages(&self) -> Vec<Message> {
        let mut result = Vec::with_capacity(self.messages.len() + 1);

        if let Some(ref prompt) = self.system_prompt {
            result.push(Message::system(prompt.clone()));
        }

        result.extend(self.messages.iter().cloned());
        result
    }

    /// Messages without the system prompt
    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    /// Get message count
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ToolCall;
    use serde_json::json;

    #[test]
    fn test_conversation_basic() {
        let mut conv = Conversation::new();
        conv.add_user("Hello");
        conv.add_assistant("Hi there!");

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.history()[1].role, "assistant");
        assert_eq!(conv.history()[1].content, "Hi there!");
    }

    #[test]
    fn test_system_prompt_leads() {
        let mut conv = Conversation::with_system_prompt("You find sponsors");
        conv.add_user("developer tool startups");

        let messages = conv.get_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(conv.history().len(), 1);
    }

    #[test]
    fn test_tool_exchange_kept_in_order() {
        let mut conv = Conversation::new();
        let call = ToolCall::new("call_1", "search_companies_by_query", json!({"query": "devtools"}));
        conv.push(Message::assistant_tool_calls("", vec![call]));
        conv.push(Message::tool("call_1", "[]"));

        let history = conv.history();
        assert_eq!(history[0].tool_calls.as_ref().map(Vec::len), Some(1));
        assert_eq!(history[1].tool_call_id.as_deref(), Some("call_1"));
    }
}
