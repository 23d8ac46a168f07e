//! Saved search and refinement tests

mod common;

use std::sync::Arc;

use common::ScriptedLlm;
use pretty_assertions::assert_eq;
use sponsorscout::agent::Refiner;
use sponsorscout::core::{Company, Confidence, ScoutError};
use sponsorscout::session::{SessionStore, TranscriptEntry};
use tempfile::TempDir;

fn annotated(url: &str, title: &str, rationale: &str, confidence: Confidence) -> Company {
    Company {
        rationale: Some(rationale.to_string()),
        confidence: Some(confidence),
        ..Company::from_result(url, title)
    }
}

fn shortlist() -> Vec<Company> {
    vec![
        annotated("https://vercel.com", "Vercel", "Frontend cloud, student credits", Confidence::High),
        annotated("https://acme-widgets.io", "Acme Widgets", "Small hardware shop", Confidence::Low),
        annotated("https://supabase.com", "Supabase", "Open source Postgres platform", Confidence::Medium),
    ]
}

#[test]
fn test_save_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path());
    let conversation = vec![
        TranscriptEntry::user("developer tool startups"),
        TranscriptEntry::user("remove hardware companies"),
        TranscriptEntry::assistant("Removed Acme Widgets"),
    ];

    let path = store
        .save("developer tool startups", &shortlist(), "dev tools!", &conversation, None)
        .unwrap();
    let filename = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(filename.ends_with("_dev_tools_.json"), "{}", filename);

    let session = store.load(&path).unwrap();
    assert_eq!(session.initial_prompt, "developer tool startups");
    assert_eq!(session.companies, shortlist());
    assert_eq!(session.company_count, 3);
    assert_eq!(session.conversation, conversation);

    let listed = store.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].path, path);
    assert_eq!(listed[0].company_count, 3);
}

#[test]
fn test_list_skips_broken_files() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path());
    store.save("fintech", &shortlist(), "", &[], None).unwrap();
    std::fs::write(dir.path().join("99999999_999999_broken.json"), "{not json").unwrap();

    let listed = store.list();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].filename.ends_with("_search.json"));
}

#[test]
fn test_listed_older_file_can_be_opened() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path());
    // Written before counts and update times were stored
    let path = dir.path().join("20240301_101500_fintech.json");
    std::fs::write(
        &path,
        r#"{
  "initial_prompt": "fintech startups",
  "timestamp": "2024-03-01T10:15:00",
  "companies": [
    {"domain": "stripe.com", "title": "Stripe", "url": "https://stripe.com"},
    {"domain": "plaid.com", "title": "Plaid", "url": "https://plaid.com"}
  ]
}"#,
    )
    .unwrap();

    let listed = store.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].company_count, 2);

    let session = store.load(&listed[0].path).unwrap();
    assert_eq!(session.initial_prompt, "fintech startups");
    assert_eq!(session.company_count, 2);
    assert_eq!(session.last_updated, session.timestamp);
    assert_eq!(session.companies[1].domain, "plaid.com");
    assert!(session.conversation.is_empty());
}

#[tokio::test]
async fn test_refinement_removal_is_persisted() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path());
    let path = store
        .save("developer tool startups", &shortlist(), "devtools", &[], None)
        .unwrap();
    let mut session = store.load(&path).unwrap();
    let created = session.timestamp;

    // The model keeps two companies and drops their annotations
    let llm = ScriptedLlm::new().reply(
        r#"{"companies": [
              {"domain": "vercel.com", "title": "Vercel", "url": "https://vercel.com"},
              {"domain": "supabase.com", "title": "Supabase", "url": "https://supabase.com"}
            ],
            "changes_made": "Removed Acme Widgets",
            "should_search_more": false}"#,
    );
    let refiner = Refiner::new(Arc::new(llm), "anthropic/claude-sonnet-4", 4096);
    let refinement = refiner
        .apply(&mut session, "remove hardware companies")
        .await
        .unwrap();
    assert_eq!(refinement.changes_made, "Removed Acme Widgets");

    store
        .save(
            &session.initial_prompt,
            &session.companies,
            "",
            &session.conversation,
            Some(&path),
        )
        .unwrap();

    let reloaded = store.load(&path).unwrap();
    let before = shortlist();
    assert_eq!(reloaded.companies, vec![before[0].clone(), before[2].clone()]);
    assert_eq!(reloaded.company_count, 2);
    assert_eq!(reloaded.timestamp, created);
    assert_eq!(
        reloaded.conversation.last(),
        Some(&TranscriptEntry::assistant("Removed Acme Widgets"))
    );
    assert_eq!(store.list().len(), 1);
}

#[tokio::test]
async fn test_malformed_refinement_leaves_session() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path());
    let path = store.save("ai startups", &shortlist(), "ai", &[], None).unwrap();
    let mut session = store.load(&path).unwrap();

    let llm = ScriptedLlm::new().reply("I removed the ones you didn't like!");
    let refiner = Refiner::new(Arc::new(llm), "anthropic/claude-sonnet-4", 4096);
    let err = refiner
        .apply(&mut session, "remove the boring ones")
        .await
        .unwrap_err();

    assert!(matches!(err, ScoutError::MalformedResponse(_)));
    assert_eq!(session.companies, shortlist());
    assert_eq!(session.conversation.len(), 1);
}
