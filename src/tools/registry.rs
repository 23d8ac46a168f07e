//! Tool registry - manages and dispatches tool calls
//!
//! Central hub for registering tools and routing tool calls to handlers.

use std::sync::Arc;

use serde_json::json;

use crate::agent::evaluator::Evaluation;
use crate::core::{Company, Config, Result, ToolCall, ToolDefinition};
use crate::llm::LLMProvider;
use crate::search::SearchProvider;
use crate::tools::discovery::DiscoveryTool;
use crate::tools::evaluate::EvaluateTool;

pub const SEARCH_SIMILAR: &str = "search_similar_companies";
pub const SEARCH_BY_QUERY: &str = "search_companies_by_query";
pub const EVALUATE: &str = "evaluate_companies";

/// What a tool handed back to the agent
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Raw discoveries from a search tool
    Companies(Vec<Company>),
    /// Verdicts from the evaluator
    Evaluation(Evaluation),
    /// The call could not run (bad arguments); the message goes back to the model
    Failed(String),
    /// The model asked for a tool that does not exist
    Unknown,
}

impl ToolOutput {
    /// Serialized form placed in the tool message
    pub fn to_content(&self) -> String {
        let value = match self {
            ToolOutput::Companies(companies) => json!(companies),
            ToolOutput::Evaluation(evaluation) => json!(evaluation),
            ToolOutput::Failed(error) => json!({ "error": error }),
            ToolOutput::Unknown => json!([]),
        };
        value.to_string()
    }
}

/// Registry of available tools
pub struct ToolRegistry {
    /// Tool definitions in registration order
    definitions: Vec<ToolDefinition>,
    discovery: DiscoveryTool,
    evaluate: EvaluateTool,
    /// Results per search when the model gives no count
    default_limit: usize,
}

impl ToolRegistry {
    /// Create a registry with the discovery and evaluation tools
    pub fn new(
        search: Arc<dyn SearchProvider>,
        llm: Arc<dyn LLMProvider>,
        config: &Config,
    ) -> Self {
        let mut registry = Self {
            definitions: Vec::new(),
            discovery: DiscoveryTool::new(search),
            evaluate: EvaluateTool::new(
                llm,
                config.models.evaluator.clone(),
                config.agent.evaluation_max_tokens,
            ),
            default_limit: config.agent.num_results,
        };

        registry.register_discovery_tools();
        registry.register_evaluation_tools();

        registry
    }

    fn register_discovery_tools(&mut self) {
        self.register(ToolDefinition::function(
            SEARCH_SIMILAR,
            "Find companies similar to a given company URL. Use this when the user mentions a specific company they want to find similar ones to, or when looking for companies in a similar space/vibe as a known company.",
            json!({
                "type": "object",
                "properties": {
                    "seed_url": {
                        "type": "string",
                        "description": "The URL of the company to find similar companies to (e.g., 'https://vercel.com')"
                    },
                    "num_results": {
                        "type": "integer",
                        "description": "Number of similar companies to find (default: 15)",
                        "default": 15
                    }
                },
                "required": ["seed_url"]
            }),
        ));

        self.register(ToolDefinition::function(
            SEARCH_BY_QUERY,
            "Search for companies matching a text description. Use this when the user describes what kind of companies they're looking for (e.g., 'developer tools startups', 'companies that sponsor hackathons', 'API-first companies').",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "A text description of the type of companies to find"
                    },
                    "num_results": {
                        "type": "integer",
                        "description": "Number of companies to find (default: 15)",
                        "default": 15
                    }
                },
                "required": ["query"]
            }),
        ));
    }

    fn register_evaluation_tools(&mut self) {
        self.register(ToolDefinition::function(
            EVALUATE,
            "Evaluate a list of discovered companies to filter out unknown ones and provide rationale for good matches. Call this AFTER you have searched for companies. The tool will return which companies are good fits (with rationale) and which were rejected (with reasons). Use the rejection feedback to refine your search strategy if needed.",
            json!({
                "type": "object",
                "properties": {
                    "companies": {
                        "type": "array",
                        "description": "Array of company objects to evaluate. Each should have 'domain', 'title', and 'url' fields.",
                        "items": {
                            "type": "object",
                            "properties": {
                                "domain": {"type": "string"},
                                "title": {"type": "string"},
                                "url": {"type": "string"}
                            }
                        }
                    }
                },
                "required": ["companies"]
            }),
        ));
    }

    /// Register a tool definition
    pub fn register(&mut self, definition: ToolDefinition) {
        self.definitions
            .retain(|d| d.function.name != definition.function.name);
        self.definitions.push(definition);
    }

    /// All tool definitions, as sent to the model
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Execute a tool call
    ///
    /// Search and model API failures propagate; argument problems come back
    /// as `ToolOutput::Failed` so the model can correct itself.
    pub async fn execute(&self, tool_call: &ToolCall, user_prompt: &str) -> Result<ToolOutput> {
        let limit = tool_call
            .get_usize("num_results")
            .filter(|n| *n > 0)
            .unwrap_or(self.default_limit);

        match tool_call.name.as_str() {
            SEARCH_SIMILAR => match tool_call.get_string("seed_url") {
                Some(seed_url) => Ok(ToolOutput::Companies(
                    self.discovery.similar(&seed_url, limit).await?,
                )),
                None => Ok(ToolOutput::Failed("Missing required argument: seed_url".into())),
            },
            SEARCH_BY_QUERY => match tool_call.get_string("query") {
                Some(query) => Ok(ToolOutput::Companies(
                    self.discovery.by_query(&query, limit).await?,
                )),
                None => Ok(ToolOutput::Failed("Missing required argument: query".into())),
            },
            EVALUATE => Ok(ToolOutput::Evaluation(
                self.evaluate.execute(tool_call, user_prompt).await?,
            )),
            _ => Ok(ToolOutput::Unknown),
        }
    }
}
