//! Mail-merge output
//!
//! Approved drafts are written as a flat CSV that bulk-mail services can
//! import directly.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::outreach::columns::ContactRow;
use crate::outreach::template::DraftEmail;

/// One approved email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMergeRecord {
    pub email: String,
    pub name: String,
    pub company: String,
    pub subject: String,
    pub body: String,
}

impl MailMergeRecord {
    pub fn new(row: &ContactRow, draft: DraftEmail) -> Self {
        Self {
            email: row.email().to_string(),
            name: row.display_name().to_string(),
            company: row.company().to_string(),
            subject: draft.subject,
            body: draft.body,
        }
    }
}

/// `mail_merge_<YYYYmmdd_HHMMSS>.csv` inside `dir`
pub fn default_output_path(dir: &Path) -> PathBuf {
    dir.join(format!(
        "mail_merge_{}.csv",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Write records under the `email,name,company,subject,body` header
pub fn write_mail_merge_csv(path: &Path, records: &[MailMergeRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
