//! Agent module - orchestration and conversation management
//!
//! Contains the discovery loop that coordinates LLM calls and tool execution,
//! the evaluator it calls as a tool, and the refinement and naming helpers
//! used after a search.

pub mod conversation;
pub mod evaluator;
pub mod loop_state;
pub mod naming;
pub mod orchestrator;
pub mod refiner;

pub use conversation::Conversation;
pub use evaluator::{Evaluation, Rejection};
pub use loop_state::{AgentLoopState, AgentOutcome, StopReason};
pub use orchestrator::Agent;
pub use refiner::{Refinement, Refiner};
