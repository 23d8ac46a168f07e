//! Pipeline stage integration tests
//!
//! Runs send and advance against a CSV workbook and a mock Mailgun.

use std::fs;

use pretty_assertions::assert_eq;
use sponsorscout::pipeline::{
    advance, send_stage_emails, CsvWorkbook, MailgunClient, SendOutcome, Sheet, Stage,
};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OUTREACH: &str = "\
Company,Email,Status,Send New Email
Vercel,ada@vercel.com,Outreach,Yes
Fly,grace@fly.io,Outreach,No
Render,linus@render.com,Negotiating,Yes
";

const NEGOTIATION: &str = "\
Company,Status,Amount,Send New Email
Supabase,Negotiating,2000,No
";

fn workbook() -> (TempDir, CsvWorkbook) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Outreach.csv"), OUTREACH).unwrap();
    fs::write(dir.path().join("Negotiation.csv"), NEGOTIATION).unwrap();
    let workbook = CsvWorkbook::new(dir.path());
    (dir, workbook)
}

async fn mailgun(status: u16) -> (MockServer, MailgunClient) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mg.example.org/messages"))
        .and(header("authorization", "Basic YXBpOmtleS0xMjM="))
        .and(body_string_contains("template=sponsor-intro"))
        .and(body_string_contains("to=ada%40vercel.com"))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(&server)
        .await;

    let client = MailgunClient::with_base_url(server.uri(), "mg.example.org", "key-123").unwrap();
    (server, client)
}

#[tokio::test]
async fn test_send_resets_flags_on_success() {
    let (_dir, workbook) = workbook();
    let (_server, client) = mailgun(200).await;

    let outcome = send_stage_emails(&workbook, &client, Stage::Outreach, "sponsor-intro")
        .await
        .unwrap();
    assert_eq!(outcome, SendOutcome::Sent { recipients: 1 });
    assert_eq!(outcome.to_string(), "Emails Successfully Sent");

    let table = workbook.read("Outreach").await.unwrap();
    assert!(table
        .rows
        .iter()
        .all(|row| table.cell(row, "Send New Email") == "No"));
}

#[tokio::test]
async fn test_send_keeps_flags_on_rejection() {
    let (_dir, workbook) = workbook();
    let (_server, client) = mailgun(401).await;

    let outcome = send_stage_emails(&workbook, &client, Stage::Outreach, "sponsor-intro")
        .await
        .unwrap();
    assert_eq!(outcome, SendOutcome::Rejected { status: 401 });

    let table = workbook.read("Outreach").await.unwrap();
    assert_eq!(table.cell(&table.rows[0], "Send New Email"), "Yes");
}

#[tokio::test]
async fn test_send_with_nothing_flagged() {
    let (_dir, workbook) = workbook();
    let server = MockServer::start().await;
    let client = MailgunClient::with_base_url(server.uri(), "mg.example.org", "key-123").unwrap();

    let outcome = send_stage_emails(&workbook, &client, Stage::Deliverables, "thanks").await;
    // Deliverables tab does not exist in this workbook
    assert!(outcome.is_err());

    let outcome = send_stage_emails(&workbook, &client, Stage::Negotiation, "follow-up")
        .await
        .unwrap();
    assert_eq!(outcome, SendOutcome::NothingToSend);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_advance_moves_negotiating_rows() {
    let (_dir, workbook) = workbook();

    let report = advance(&workbook, Stage::Outreach).await.unwrap();
    assert_eq!(report.moved, 1);
    assert_eq!(report.to_string(), "Successfully updated Negotiation");

    let outreach = workbook.read("Outreach").await.unwrap();
    let companies: Vec<&str> = outreach.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(companies, vec!["Vercel", "Fly"]);

    let negotiation = workbook.read("Negotiation").await.unwrap();
    assert_eq!(negotiation.rows.len(), 2);
    assert_eq!(
        negotiation.rows[1],
        vec!["Render", "Negotiating", "Null", "Yes"]
    );
}

#[tokio::test]
async fn test_advance_into_headerless_tab_keeps_rows() {
    let (dir, workbook) = workbook();
    fs::write(dir.path().join("Negotiation.csv"), "").unwrap();

    let err = advance(&workbook, Stage::Outreach).await.unwrap_err();
    assert!(err.to_string().contains("no header row"), "{}", err);

    assert_eq!(fs::read_to_string(dir.path().join("Outreach.csv")).unwrap(), OUTREACH);
    assert_eq!(fs::read_to_string(dir.path().join("Negotiation.csv")).unwrap(), "");
}

#[tokio::test]
async fn test_last_stage_cannot_advance() {
    let (_dir, workbook) = workbook();
    assert!(advance(&workbook, Stage::Deliverables).await.is_err());
}
