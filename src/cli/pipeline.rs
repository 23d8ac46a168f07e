//! Pipeline subcommands
//!
//! One-shot `send` and `advance` runs against the configured spreadsheet.

use crate::core::{Config, Result, ScoutError};
use crate::pipeline::{advance, open_sheet, send_stage_emails, MailgunClient, SendOutcome, Stage};

/// Template named on the command line, else the configured one
pub fn resolve_template(config: &Config, template: Option<String>) -> Result<String> {
    template
        .filter(|t| !t.trim().is_empty())
        .or_else(|| Some(config.mailgun.template.clone()).filter(|t| !t.trim().is_empty()))
        .ok_or_else(|| {
            ScoutError::config("No Mailgun template given; pass --template or set MAILGUN_TEMPLATE")
        })
}

/// Send the stage's flagged emails and print the outcome
pub async fn run_send(config: &Config, stage: Stage, template: Option<String>) -> Result<SendOutcome> {
    let template = resolve_template(config, template)?;
    let sheet = open_sheet(config)?;
    let mailer = MailgunClient::from_config(config)?;

    println!("📨 Sending {} emails via template '{}'...", stage, template);
    let outcome = send_stage_emails(sheet.as_ref(), &mailer, stage, &template).await?;
    match &outcome {
        SendOutcome::Sent { recipients } => println!("✅ {} ({} recipients)", outcome, recipients),
        SendOutcome::Rejected { status } => println!("❌ {} (HTTP {})", outcome, status),
        SendOutcome::NothingToSend => println!("{}", outcome),
    }

    Ok(outcome)
}

/// Move rows that reached the next stage and print the report
pub async fn run_advance(config: &Config, from: Stage) -> Result<()> {
    let sheet = open_sheet(config)?;
    let report = advance(sheet.as_ref(), from).await?;
    println!("✅ {} ({} rows moved from {})", report, report.moved, report.from);
    Ok(())
}
