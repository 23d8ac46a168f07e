//! Pipeline module - spreadsheet-backed sponsor stages
//!
//! Sends templated Mailgun emails to flagged rows and advances rows from
//! one stage tab to the next.

pub mod google;
pub mod mailgun;
pub mod sheet;
pub mod stages;

use crate::core::config::SheetBackend;
use crate::core::{Config, Result};

pub use google::GoogleSheetsClient;
pub use mailgun::MailgunClient;
pub use sheet::{CsvWorkbook, Sheet, Table};
pub use stages::{advance, send_stage_emails, AdvanceReport, SendOutcome, Stage};

/// Open the configured spreadsheet backend
pub fn open_sheet(config: &Config) -> Result<Box<dyn Sheet>> {
    Ok(match config.sheets.backend {
        SheetBackend::Google => Box::new(GoogleSheetsClient::from_config(config)?),
        SheetBackend::Csv => Box::new(CsvWorkbook::new(&config.sheets.workbook_dir)),
    })
}
