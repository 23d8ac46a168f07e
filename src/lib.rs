//! Sponsorscout - hackathon sponsor discovery and outreach
//!
//! An LLM agent finds candidate sponsor companies through neural search and
//! vets them with an evaluator model. The approved list can be refined in
//! chat, enriched with LinkedIn contacts, turned into personalized emails,
//! and tracked through spreadsheet pipeline stages.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Chat-completions abstraction with an OpenRouter implementation
//! - **Search**: Neural search abstraction with an Exa implementation
//! - **Tools**: Tools the discovery agent calls
//! - **Agent**: Discovery loop, evaluator, refinement and naming
//! - **Session**: Saved searches on disk
//! - **Enrichment**: LinkedIn contact lookup
//! - **Outreach**: Mail-merge generation
//! - **Pipeline**: Spreadsheet stages and Mailgun sends
//! - **CLI**: REPL and subcommand flows
//!
//! # Usage
//!
//! ```rust,no_run
//! use sponsorscout::{Agent, Config};
//! use sponsorscout::llm::OpenRouterClient;
//! use sponsorscout::search::ExaClient;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> sponsorscout::Result<()> {
//!     let config = Config::load();
//!     let llm = Arc::new(OpenRouterClient::from_config(&config)?);
//!     let search = Arc::new(ExaClient::from_config(&config)?);
//!     let agent = Agent::new(config, llm, search);
//!
//!     let outcome = agent
//!         .run("developer tool startups", &CancellationToken::new())
//!         .await?;
//!     for company in outcome.companies {
//!         println!("{}", company.domain);
//!     }
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod enrichment;
pub mod llm;
pub mod outreach;
pub mod pipeline;
pub mod search;
pub mod session;
pub mod tools;

// Re-export commonly used items
pub use agent::{Agent, AgentOutcome};
pub use cli::{MailMerge, Repl};
pub use core::{Company, Config, Result, ScoutError};
pub use session::SessionStore;
