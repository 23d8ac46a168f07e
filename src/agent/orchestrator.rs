//! Agent orchestrator
//!
//! Main agent that coordinates the chat model, the discovery tools and the
//! evaluator. The model keeps calling tools until it answers in plain text,
//! the round ceiling is hit, or the run is cancelled.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::agent::conversation::Conversation;
use crate::agent::loop_state::{AgentLoopState, AgentOutcome};
use crate::core::{Config, Message, Result, ToolCall};
use crate::llm::{LLMProvider, LLMResponse};
use crate::search::SearchProvider;
use crate::tools::registry::EVALUATE;
use crate::tools::ToolRegistry;

pub const SYSTEM_PROMPT: &str = r#"You are a helpful assistant that finds potential sponsor companies for hackathons and tech events.

You have access to these tools:
1. search_similar_companies: Find companies similar to a known company URL
2. search_companies_by_query: Search for companies by text description
3. evaluate_companies: Evaluate discovered companies to filter out bad matches and get rationale for good ones

YOUR WORKFLOW:
1. Analyze the user's request to understand what kind of companies they're looking for
2. Use search tools to find potential companies (you can make multiple searches)
3. IMPORTANT: Call evaluate_companies with ALL the companies you've found so far
4. Review the evaluation feedback - if many companies were rejected, consider doing additional targeted searches
5. You may call evaluate_companies multiple times as you refine your search
6. When you're satisfied with the results, summarize what you found

The evaluate_companies tool will:
- Filter out companies the evaluator doesn't recognize
- Filter out hackathon platforms and other hackathons (we want sponsors, not platforms)
- Provide rationale and confidence for each good match
- Give you feedback on why companies were rejected (use this to improve your search!)

Think strategically about good search queries. For hackathon sponsors, consider:
- Developer tools and API companies (they often give credits)
- Cloud infrastructure providers (AWS, GCP, DigitalOcean, etc.)
- DevOps and monitoring tools
- Companies known for university/developer programs

Always aim for QUALITY over quantity - it's better to have 10 well-vetted companies than 50 unknown ones."#;

/// Main agent that orchestrates LLM and tools
pub struct Agent {
    /// Configuration
    config: Config,
    /// Chat model client
    llm: Arc<dyn LLMProvider>,
    /// Tool registry
    tools: ToolRegistry,
}

impl Agent {
    /// Create an agent over the given model and search backends
    pub fn new(config: Config, llm: Arc<dyn LLMProvider>, search: Arc<dyn SearchProvider>) -> Self {
        let tools = ToolRegistry::new(search, llm.clone(), &config);
        Self { config, llm, tools }
    }

    /// Tools offered to the model
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run the tool-calling loop for one discovery request
    ///
    /// Returns the approved companies, unique by domain. Cancellation and
    /// the round ceiling both end the run early with what was approved so
    /// far; API failures abort it with an error.
    pub async fn run(&self, user_prompt: &str, cancel: &CancellationToken) -> Result<AgentOutcome> {
        let mut conversation = Conversation::with_system_prompt(SYSTEM_PROMPT);
        conversation.add_user(user_prompt);

        let mut state = AgentLoopState::new(self.config.agent.max_rounds);

        println!("\n{}", "=".repeat(60));
        println!("🧠 Agent is thinking...");
        println!("{}", "=".repeat(60));
        info!(max_rounds = state.max_rounds, "Starting discovery loop");

        'rounds: while state.should_continue() {
            debug!(
                round = state.round + 1,
                messages = conversation.len(),
                "Calling agent model"
            );

            let response = match until_cancelled(cancel, self.call_model(&conversation)).await {
                Some(response) => response?,
                None => {
                    state.cancel();
                    break;
                }
            };
            state.next_round();

            if response.tool_calls.is_empty() {
                if !response.content.is_empty() {
                    println!("\n{}", "=".repeat(60));
                    println!("🤖 Agent Summary:");
                    println!("{}", "=".repeat(60));
                    println!("{}", response.content);
                }
                state.complete(response.content);
                break;
            }

            conversation.push(Message::assistant_tool_calls(
                response.content.clone(),
                response.tool_calls.clone(),
            ));

            for tool_call in &response.tool_calls {
                announce(tool_call);

                let output =
                    match until_cancelled(cancel, self.tools.execute(tool_call, user_prompt)).await
                    {
                        Some(output) => output?,
                        None => {
                            state.cancel();
                            break 'rounds;
                        }
                    };

                state.record(&output);
                conversation.push(Message::tool(&tool_call.id, output.to_content()));
            }
        }

        let outcome = state.finish();
        info!(
            rounds = outcome.rounds,
            approved = outcome.companies.len(),
            stop = %outcome.stop,
            "Discovery loop finished"
        );
        Ok(outcome)
    }

    async fn call_model(&self, conversation: &Conversation) -> Result<LLMResponse> {
        self.llm
            .chat_with_tools(
                &self.config.models.agent,
                &conversation.get_messages(),
                self.tools.definitions(),
                None,
            )
            .await
    }
}

/// Await `fut` unless the token fires first
async fn until_cancelled<F: Future>(cancel: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        output = fut => Some(output),
    }
}

fn announce(tool_call: &ToolCall) {
    println!("\n📞 Agent calling: {}", tool_call.name);
    if tool_call.name != EVALUATE {
        let arguments = serde_json::to_string_pretty(&tool_call.arguments)
            .unwrap_or_else(|_| tool_call.arguments.to_string());
        println!("   Arguments: {}", arguments);
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("model", &self.config.models.agent)
            .field("provider", &self.llm.name())
            .field("max_rounds", &self.config.agent.max_rounds)
            .finish()
    }
}
