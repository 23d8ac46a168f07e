//! Outreach module - personalized mail-merge generation
//!
//! Reads an enriched contact sheet, fills an email template per contact
//! (column values plus model-written snippets) and writes the approved
//! emails as a mail-merge CSV.

pub mod columns;
pub mod mail_merge;
pub mod template;

pub use columns::{load_contacts, resolve_column, ContactRow, COLUMN_ALIASES};
pub use mail_merge::{write_mail_merge_csv, MailMergeRecord};
pub use template::{split_subject, substitute_variables, DraftEmail, EmailWriter};
