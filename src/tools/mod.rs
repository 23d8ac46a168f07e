//! Tools module - tools the discovery agent can call
//!
//! Contains the search-backed discovery tools, the evaluation tool, and the
//! tool registry.

pub mod discovery;
pub mod evaluate;
pub mod registry;

pub use registry::{ToolOutput, ToolRegistry};
