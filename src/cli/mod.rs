//! CLI module - command-line interface
//!
//! Contains the discovery REPL, the mail-merge flow, the pipeline
//! subcommands and input parsing.

pub mod commands;
pub mod mail_merge;
pub mod pipeline;
pub mod repl;

pub use mail_merge::{DraftReview, MailMerge, StdinReview};
pub use repl::Repl;
