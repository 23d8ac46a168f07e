//! Interactive mail-merge flow
//!
//! Generates one draft per contact, lets the operator approve, skip or
//! regenerate it, and writes the approved drafts to a CSV.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::cli::commands::{parse_preview, PreviewAction};
use crate::cli::repl::read_line;
use crate::core::{Config, Result, ScoutError};
use crate::llm::{LLMProvider, OpenRouterClient};
use crate::outreach::mail_merge::default_output_path;
use crate::outreach::{
    load_contacts, write_mail_merge_csv, ContactRow, DraftEmail, EmailWriter, MailMergeRecord,
};

/// Contacts CSV used when `--csv` is not given
pub fn default_contacts_path(config: &Config) -> PathBuf {
    config.session.dir.join("people").join("people_enriched.csv")
}

fn print_preview(index: usize, total: usize, record: &MailMergeRecord) {
    println!("\n{}", "=".repeat(60));
    println!("📧 EMAIL {}/{}", index + 1, total);
    println!("{}", "=".repeat(60));
    println!("To:      {} <{}>", record.name, record.email);
    println!("Company: {}", record.company);
    println!("Subject: {}", record.subject);
    println!("{}", "-".repeat(60));
    println!("{}", record.body);
    println!("{}", "-".repeat(60));
}

/// Operator decisions on each previewed draft
pub trait DraftReview {
    /// Choose what to do with a freshly generated draft
    fn action(&mut self, record: &MailMergeRecord) -> Result<PreviewAction>;

    /// Approve or reject a regenerated draft
    fn confirm(&mut self, record: &MailMergeRecord) -> Result<bool>;
}

/// Reviews drafts at the terminal; end of input quits
pub struct StdinReview;

impl DraftReview for StdinReview {
    fn action(&mut self, _record: &MailMergeRecord) -> Result<PreviewAction> {
        loop {
            let Some(input) = read_line("\n[a]pprove  [s]kip  [r]egenerate  [q]uit: ")? else {
                return Ok(PreviewAction::Quit);
            };
            match parse_preview(&input) {
                Some(action) => return Ok(action),
                None => println!("Invalid choice. Please enter a, s, r, or q."),
            }
        }
    }

    fn confirm(&mut self, _record: &MailMergeRecord) -> Result<bool> {
        let answer = read_line("\nApprove this version? (y/n): ")?;
        Ok(answer.as_deref().map(str::to_lowercase).as_deref() == Some("y"))
    }
}

/// Mail-merge flow over an LLM backend
pub struct MailMerge {
    writer: EmailWriter,
}

impl MailMerge {
    /// Create the flow talking to OpenRouter
    pub fn with_config(config: &Config) -> Result<Self> {
        let llm: Arc<dyn LLMProvider> = Arc::new(OpenRouterClient::from_config(config)?);
        Ok(Self::new(llm, &config.models.writer))
    }

    pub fn new(llm: Arc<dyn LLMProvider>, model: &str) -> Self {
        Self {
            writer: EmailWriter::new(llm, model),
        }
    }

    /// Run the interactive flow; returns the output path when anything was written
    pub async fn run(
        &self,
        csv_path: &Path,
        template_path: &Path,
        output: Option<PathBuf>,
    ) -> Result<Option<PathBuf>> {
        self.run_with(csv_path, template_path, output, &mut StdinReview)
            .await
    }

    /// Run the flow with the given reviewer deciding on each draft
    ///
    /// A contact whose draft cannot be generated is reported and skipped;
    /// drafts approved so far are still written.
    pub async fn run_with(
        &self,
        csv_path: &Path,
        template_path: &Path,
        output: Option<PathBuf>,
        review: &mut dyn DraftReview,
    ) -> Result<Option<PathBuf>> {
        let template = fs::read_to_string(template_path).map_err(|e| {
            ScoutError::with_context(
                format!("Failed to read template {}", template_path.display()),
                e,
            )
        })?;

        let contacts = load_contacts(csv_path)?;
        println!(
            "\n📇 Loaded {} contacts with emails from {}",
            contacts.len(),
            csv_path.display()
        );
        if contacts.is_empty() {
            println!("Nothing to do.");
            return Ok(None);
        }

        let total = contacts.len();
        let mut approved = Vec::new();

        'contacts: for (index, row) in contacts.iter().enumerate() {
            println!("\n✍️  Drafting email for {} ({})", row.display_name(), row.company());
            let Some(draft) = self.draft(&template, row).await else {
                continue 'contacts;
            };
            let record = MailMergeRecord::new(row, draft);
            print_preview(index, total, &record);

            match review.action(&record)? {
                PreviewAction::Approve => approved.push(record),
                PreviewAction::Skip => println!("Skipped."),
                PreviewAction::Quit => break 'contacts,
                PreviewAction::Regenerate => {
                    let Some(DraftEmail { subject, body }) = self.draft(&template, row).await
                    else {
                        continue 'contacts;
                    };
                    let record = MailMergeRecord {
                        subject,
                        body,
                        ..record
                    };
                    print_preview(index, total, &record);

                    if review.confirm(&record)? {
                        approved.push(record);
                    } else {
                        println!("Skipped.");
                    }
                }
            }
        }

        if approved.is_empty() {
            println!("\nNo emails approved; nothing written.");
            return Ok(None);
        }

        let path = output.unwrap_or_else(|| default_output_path(Path::new(".")));
        write_mail_merge_csv(&path, &approved)?;
        info!(count = approved.len(), path = %path.display(), "Wrote mail merge");
        println!(
            "\n🎉 Saved {} approved emails to {}",
            approved.len(),
            path.display()
        );

        Ok(Some(path))
    }

    async fn draft(&self, template: &str, row: &ContactRow) -> Option<DraftEmail> {
        match self.writer.generate_email(template, row).await {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!(company = row.company(), error = %e, "Draft generation failed");
                println!("❌ Error: {}", e);
                None
            }
        }
    }
}
