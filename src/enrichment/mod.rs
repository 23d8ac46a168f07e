//! Enrichment module - finding people at approved companies

pub mod contacts;

pub use contacts::{parse_profile_title, role_queries, write_contacts_csv, Contact, ContactFinder};
