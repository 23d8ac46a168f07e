//! Sponsor pipeline stages
//!
//! Each stage is a spreadsheet tab. Rows carry a `Status` naming the stage
//! they belong in and a `Send New Email` flag the team sets by hand.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::core::{Result, ScoutError};
use crate::pipeline::mailgun::MailgunClient;
use crate::pipeline::sheet::{Sheet, Table};

pub const STATUS_COLUMN: &str = "Status";
pub const SEND_FLAG_COLUMN: &str = "Send New Email";
pub const EMAIL_COLUMN: &str = "Email";
/// Filler for destination columns the source tab lacks
pub const MISSING_CELL: &str = "Null";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Outreach,
    Negotiation,
    Deliverables,
}

impl Stage {
    /// Spreadsheet tab holding the stage
    pub fn tab(&self) -> &'static str {
        match self {
            Stage::Outreach => "Outreach",
            Stage::Negotiation => "Negotiation",
            Stage::Deliverables => "Deliverables",
        }
    }

    /// `Status` value marking a row as belonging to the stage
    pub fn status(&self) -> &'static str {
        match self {
            Stage::Outreach => "Outreach",
            Stage::Negotiation => "Negotiating",
            Stage::Deliverables => "Confirmed",
        }
    }

    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Outreach => Some(Stage::Negotiation),
            Stage::Negotiation => Some(Stage::Deliverables),
            Stage::Deliverables => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tab())
    }
}

impl FromStr for Stage {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "outreach" => Ok(Stage::Outreach),
            "negotiation" | "negotiating" => Ok(Stage::Negotiation),
            "deliverables" | "confirmed" => Ok(Stage::Deliverables),
            other => Err(ScoutError::config(format!("Unknown stage: {}", other))),
        }
    }
}

/// Result of a send request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// No row was flagged
    NothingToSend,
    /// Mailgun accepted the message
    Sent { recipients: usize },
    /// Mailgun answered with a non-200 status; flags were left alone
    Rejected { status: u16 },
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendOutcome::NothingToSend => write!(f, "No emails to send!"),
            SendOutcome::Sent { .. } => write!(f, "Emails Successfully Sent"),
            SendOutcome::Rejected { .. } => write!(f, "Emails not sent, check Mailgun logs"),
        }
    }
}

/// Emails of rows in `stage` whose send flag is `Yes`
pub fn pending_recipients(table: &Table, stage: Stage) -> Vec<String> {
    table
        .rows
        .iter()
        .filter(|row| {
            table.cell(row, STATUS_COLUMN) == stage.status()
                && table.cell(row, SEND_FLAG_COLUMN) == "Yes"
        })
        .map(|row| table.cell(row, EMAIL_COLUMN).to_string())
        .collect()
}

/// Set every row's send flag to `No`
pub fn reset_send_flag(table: &mut Table) {
    if let Some(flag) = table.column(SEND_FLAG_COLUMN) {
        for row in &mut table.rows {
            if let Some(cell) = row.get_mut(flag) {
                *cell = "No".to_string();
            }
        }
    }
}

/// Mail every flagged row of a stage through a Mailgun template
pub async fn send_stage_emails(
    sheet: &dyn Sheet,
    mailer: &MailgunClient,
    stage: Stage,
    template: &str,
) -> Result<SendOutcome> {
    let mut table = sheet.read(stage.tab()).await?;
    let recipients = pending_recipients(&table, stage);
    if recipients.is_empty() {
        return Ok(SendOutcome::NothingToSend);
    }

    let status = mailer.send_template(&recipients, template).await?;
    if status != 200 {
        return Ok(SendOutcome::Rejected { status });
    }

    reset_send_flag(&mut table);
    sheet.write(stage.tab(), &table).await?;
    info!(stage = %stage, recipients = recipients.len(), "Stage emails sent");

    Ok(SendOutcome::Sent {
        recipients: recipients.len(),
    })
}

/// Map a source row onto the destination header
pub fn project_row(source_header: &[String], row: &[String], dest_header: &[String]) -> Vec<String> {
    dest_header
        .iter()
        .map(|column| {
            source_header
                .iter()
                .position(|h| h == column)
                .and_then(|i| row.get(i))
                .cloned()
                .unwrap_or_else(|| MISSING_CELL.to_string())
        })
        .collect()
}

/// Rows moved by an advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceReport {
    pub from: Stage,
    pub to: Stage,
    pub moved: usize,
}

impl fmt::Display for AdvanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Successfully updated {}", self.to)
    }
}

/// Move rows whose status names the next stage into the next stage's tab
pub async fn advance(sheet: &dyn Sheet, from: Stage) -> Result<AdvanceReport> {
    let to = from
        .next()
        .ok_or_else(|| ScoutError::sheet(format!("{} is the last stage", from)))?;

    let source = sheet.read(from.tab()).await?;
    let mut dest = sheet.read(to.tab()).await?;

    let (moving, staying): (Vec<Vec<String>>, Vec<Vec<String>>) = source
        .rows
        .iter()
        .cloned()
        .partition(|row| source.cell(row, STATUS_COLUMN) == to.status());

    let moved = moving.len();
    if moved > 0 && dest.header.is_empty() {
        return Err(ScoutError::sheet(format!(
            "{} tab has no header row; refusing to move {} rows",
            to, moved
        )));
    }
    dest.rows.extend(
        moving
            .iter()
            .map(|row| project_row(&source.header, row, &dest.header)),
    );

    sheet.clear(to.tab()).await?;
    sheet.write(to.tab(), &dest).await?;

    let remaining = Table::new(source.header.clone(), staying);
    sheet.clear(from.tab()).await?;
    sheet.write(from.tab(), &remaining).await?;

    info!(from = %from, to = %to, moved, "Advanced pipeline rows");
    Ok(AdvanceReport { from, to, moved })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn outreach_table() -> Table {
        Table::new(
            strings(&["Company", "Email", "Status", "Send New Email"]),
            vec![
                strings(&["Vercel", "ada@vercel.com", "Outreach", "Yes"]),
                strings(&["Fly", "grace@fly.io", "Outreach", "No"]),
                strings(&["Render", "linus@render.com", "Negotiating", "Yes"]),
            ],
        )
    }

    #[test]
    fn test_pending_recipients_by_stage() {
        let table = outreach_table();
        assert_eq!(pending_recipients(&table, Stage::Outreach), vec!["ada@vercel.com"]);
        assert_eq!(
            pending_recipients(&table, Stage::Negotiation),
            vec!["linus@render.com"]
        );
        assert!(pending_recipients(&table, Stage::Deliverables).is_empty());
    }

    #[test]
    fn test_reset_send_flag() {
        let mut table = outreach_table();
        reset_send_flag(&mut table);
        assert!(table.rows.iter().all(|row| row[3] == "No"));
    }

    #[test]
    fn test_project_row_fills_null() {
        let projected = project_row(
            &strings(&["Company", "Email", "Status"]),
            &strings(&["Vercel", "ada@vercel.com", "Negotiating"]),
            &strings(&["Company", "Amount", "Status"]),
        );
        assert_eq!(projected, strings(&["Vercel", "Null", "Negotiating"]));
    }

    #[test]
    fn test_stage_parsing_and_order() {
        assert_eq!("outreach".parse::<Stage>().unwrap(), Stage::Outreach);
        assert_eq!("Negotiation".parse::<Stage>().unwrap(), Stage::Negotiation);
        assert!("sponsors".parse::<Stage>().is_err());
        assert_eq!(Stage::Negotiation.next(), Some(Stage::Deliverables));
        assert_eq!(Stage::Deliverables.next(), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(SendOutcome::NothingToSend.to_string(), "No emails to send!");
        assert_eq!(
            SendOutcome::Rejected { status: 401 }.to_string(),
            "Emails not sent, check Mailgun logs"
        );
        let report = AdvanceReport {
            from: Stage::Outreach,
            to: Stage::Negotiation,
            moved: 1,
        };
        assert_eq!(report.to_string(), "Successfully updated Negotiation");
    }
}
