//! Session module - saved searches on disk

pub mod store;

pub use store::{sanitize_hint, Session, SessionStore, SessionSummary, TranscriptEntry};
