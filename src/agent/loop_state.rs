//! Agent loop state management
//!
//! Tracks rounds of the tool-calling loop and the companies approved so far.

use serde::{Deserialize, Serialize};

use crate::core::{dedupe_by_domain, Company};
use crate::tools::ToolOutput;

/// Why the agent loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model answered without tool calls
    Completed,
    /// The round ceiling was reached
    MaxRounds,
    /// The operator interrupted the run
    Cancelled,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Completed => write!(f, "completed"),
            StopReason::MaxRounds => write!(f, "max rounds reached"),
            StopReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// State of the agent reasoning loop
#[derive(Debug, Clone)]
pub struct AgentLoopState {
    /// Model responses received so far
    pub round: usize,
    /// Maximum allowed rounds
    pub max_rounds: usize,
    /// Companies approved by every evaluation, in arrival order
    pub approved: Vec<Company>,
    /// Raw companies returned by search tools
    pub discovered: usize,
    /// Final summary text from the model
    pub summary: Option<String>,
    /// Set once the loop has stopped
    pub stop: Option<StopReason>,
}

impl AgentLoopState {
    /// Create a new loop state with the given round ceiling
    pub fn new(max_rounds: usize) -> Self {
        Self {
            round: 0,
            max_rounds,
            approved: Vec::new(),
            discovered: 0,
            summary: None,
            stop: None,
        }
    }

    /// Check if the loop should continue
    pub fn should_continue(&self) -> bool {
        self.stop.is_none() && self.round < self.max_rounds
    }

    /// Increment the round counter
    pub fn next_round(&mut self) {
        self.round += 1;
    }

    /// Fold a tool result into the state
    pub fn record(&mut self, output: &ToolOutput) {
        match output {
            ToolOutput::Companies(companies) => self.discovered += companies.len(),
            ToolOutput::Evaluation(evaluation) => {
                self.approved.extend(evaluation.approved.iter().cloned())
            }
            ToolOutput::Failed(_) | ToolOutput::Unknown => {}
        }
    }

    /// The model gave its final answer
    pub fn complete(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
        self.stop = Some(StopReason::Completed);
    }

    /// Stop early because of an interrupt
    pub fn cancel(&mut self) {
        self.stop = Some(StopReason::Cancelled);
    }

    /// Consume the state into the run outcome
    pub fn finish(self) -> AgentOutcome {
        AgentOutcome {
            companies: dedupe_by_domain(self.approved),
            summary: self.summary.unwrap_or_default(),
            rounds: self.round,
            stop: self.stop.unwrap_or(StopReason::MaxRounds),
        }
    }
}

/// Result of one agent run
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutcome {
    /// Approved companies, unique by domain
    pub companies: Vec<Company>,
    /// The model's closing summary, empty if it never gave one
    pub summary: String,
    /// Model round trips performed
    pub rounds: usize,
    pub stop: StopReason,
}
