//! Contact enrichment and mail-merge tests

mod common;

use std::fs;
use std::sync::Arc;

use common::{ScriptedLlm, StaticSearch};
use pretty_assertions::assert_eq;
use sponsorscout::cli::commands::PreviewAction;
use sponsorscout::cli::{DraftReview, MailMerge};
use sponsorscout::core::config::EnrichmentConfig;
use sponsorscout::core::{Company, Result};
use sponsorscout::enrichment::{write_contacts_csv, ContactFinder};
use sponsorscout::outreach::{load_contacts, write_mail_merge_csv, EmailWriter, MailMergeRecord};
use sponsorscout::search::SearchHit;
use tempfile::TempDir;

fn quick_enrichment() -> EnrichmentConfig {
    EnrichmentConfig {
        query_delay_ms: 0,
        company_delay_ms: 0,
        ..EnrichmentConfig::default()
    }
}

#[tokio::test]
async fn test_enrichment_keeps_unique_profiles() {
    let search = StaticSearch {
        people: vec![
            SearchHit::new(
                "https://www.linkedin.com/in/ada",
                "Ada Lovelace - Developer Advocate - Vercel",
            ),
            SearchHit::new("https://vercel.com/careers", "Careers at Vercel"),
        ],
        ..Default::default()
    };
    let settings = quick_enrichment();
    let finder = ContactFinder::new(&search, &settings);

    let companies = vec![
        Company::from_result("https://vercel.com", "Vercel"),
        Company::default(),
    ];
    let contacts = finder.enrich_companies(&companies).await;

    // Five role queries for Vercel, none for the company without a domain
    assert_eq!(search.requests.lock().unwrap().len(), 5);
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Ada Lovelace");
    assert_eq!(contacts[0].title, "Developer Advocate");
    assert_eq!(contacts[0].domain, "vercel.com");

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sponsor_contacts.csv");
    write_contacts_csv(&path, &contacts).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(
        written.lines().next(),
        Some("Company,Domain,Name,Title,LinkedIn,Email")
    );
    assert!(written.contains("https://www.linkedin.com/in/ada"));
}

#[tokio::test]
async fn test_failed_people_search_is_skipped() {
    let search = StaticSearch {
        fail: true,
        ..Default::default()
    };
    let settings = quick_enrichment();
    let finder = ContactFinder::new(&search, &settings);

    let contacts = finder.find_linkedin_contacts("Supabase", "supabase.com").await;
    assert!(contacts.is_empty());
    assert_eq!(search.requests.lock().unwrap().len(), 5);
}

const CONTACTS_CSV: &str = "\u{feff}First Name (Linkedin),Full Name (Linkedin),Company,Email (FullEnrich),Headline (Linkedin)
Ada,Ada Lovelace,Vercel,ada@vercel.com,Developer Advocate at Vercel
Grace,Grace Hopper,Fly,,Engineer
";

const TEMPLATE: &str = "Subject: Sponsor {company} at ScottyLabs
Hi {name},

{{one sentence on why {company} fits a student hackathon}}

Best,
ScottyLabs";

#[tokio::test]
async fn test_mail_merge_draft_and_output() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("people_enriched.csv");
    fs::write(&csv_path, CONTACTS_CSV).unwrap();

    let contacts = load_contacts(&csv_path).unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].get("First Name (Linkedin)"), Some("Ada"));

    let llm = Arc::new(
        ScriptedLlm::new().reply("Vercel's frontend cloud is what most teams deploy on."),
    );
    let writer = EmailWriter::new(llm.clone(), "anthropic/claude-sonnet-4");
    let draft = writer.generate_email(TEMPLATE, &contacts[0]).await.unwrap();

    assert_eq!(draft.subject, "Sponsor Vercel at ScottyLabs");
    assert_eq!(
        draft.body,
        "Hi Ada,\n\nVercel's frontend cloud is what most teams deploy on.\n\nBest,\nScottyLabs"
    );
    assert_eq!(
        *llm.chat_prompts.lock().unwrap(),
        vec!["one sentence on why Vercel fits a student hackathon".to_string()]
    );

    let record = MailMergeRecord::new(&contacts[0], draft);
    let output = dir.path().join("mail_merge.csv");
    write_mail_merge_csv(&output, &[record]).unwrap();
    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("email,name,company,subject,body\n"));
    assert!(written.contains("ada@vercel.com,Ada Lovelace,Vercel,Sponsor Vercel at ScottyLabs"));
}

/// Approves every draft it is shown
#[derive(Default)]
struct ApproveAll {
    seen: Vec<String>,
}

impl DraftReview for ApproveAll {
    fn action(&mut self, record: &MailMergeRecord) -> Result<PreviewAction> {
        self.seen.push(record.email.clone());
        Ok(PreviewAction::Approve)
    }

    fn confirm(&mut self, record: &MailMergeRecord) -> Result<bool> {
        self.seen.push(record.email.clone());
        Ok(true)
    }
}

#[tokio::test]
async fn test_mail_merge_keeps_approved_drafts_after_failure() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("people_enriched.csv");
    fs::write(
        &csv_path,
        "Full Name (Linkedin),Company,Email (FullEnrich)
Ada Lovelace,Vercel,ada@vercel.com
Linus Torvalds,Render,linus@render.com
",
    )
    .unwrap();
    let template_path = dir.path().join("template.txt");
    fs::write(&template_path, TEMPLATE).unwrap();
    let output = dir.path().join("mail_merge.csv");

    // One scripted reply: the second contact's draft fails
    let llm = Arc::new(ScriptedLlm::new().reply("Vercel hosts half the demos anyway."));
    let flow = MailMerge::new(llm, "anthropic/claude-sonnet-4");
    let mut review = ApproveAll::default();

    let written = flow
        .run_with(&csv_path, &template_path, Some(output.clone()), &mut review)
        .await
        .unwrap();

    assert_eq!(written, Some(output.clone()));
    assert_eq!(review.seen, vec!["ada@vercel.com".to_string()]);
    let merged = fs::read_to_string(&output).unwrap();
    assert_eq!(merged.lines().filter(|l| l.contains("@")).count(), 1);
    assert!(merged.contains("ada@vercel.com,Ada Lovelace,Vercel,Sponsor Vercel at ScottyLabs"));
    assert!(!merged.contains("linus@render.com"));
}
