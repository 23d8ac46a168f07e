//! Discovery loop integration tests
//!
//! Drives the agent with a scripted model and a static search backend.

mod common;

use std::sync::Arc;

use common::{call, ScriptedLlm, StaticSearch};
use pretty_assertions::assert_eq;
use serde_json::json;
use sponsorscout::agent::{Agent, StopReason};
use sponsorscout::core::Config;
use sponsorscout::llm::LLMResponse;
use sponsorscout::search::SearchHit;
use sponsorscout::tools::registry::{EVALUATE, SEARCH_BY_QUERY, SEARCH_SIMILAR};
use tokio_util::sync::CancellationToken;

fn test_config(max_rounds: usize) -> Config {
    let mut config = Config::default();
    config.agent.max_rounds = max_rounds;
    config
}

fn devtools_search() -> StaticSearch {
    StaticSearch {
        by_query: vec![
            SearchHit::new("https://vercel.com", "Vercel"),
            SearchHit::new("https://supabase.com", "Supabase"),
        ],
        similar: vec![
            SearchHit::new("https://www.vercel.com/home", "Vercel"),
            SearchHit::new("https://fly.io", "Fly.io"),
        ],
        ..Default::default()
    }
}

const VERCEL_APPROVED: &str = r#"{"approved": [{"domain": "vercel.com", "title": "Vercel",
  "url": "https://vercel.com", "rationale": "Frontend cloud with a student program",
  "confidence": "high"}],
 "rejected": [{"domain": "fly.io", "reason": "Unknown company"}]}"#;

#[tokio::test]
async fn test_overlapping_rounds_keep_one_vercel() {
    let vercel = json!({"domain": "vercel.com", "title": "Vercel", "url": "https://vercel.com"});
    let llm = ScriptedLlm::new()
        .agent_turn(LLMResponse::with_tool_calls(vec![
            call("c1", SEARCH_BY_QUERY, json!({"query": "developer tool startups"})),
            call("c2", SEARCH_SIMILAR, json!({"seed_url": "https://vercel.com", "num_results": 5})),
        ]))
        .agent_turn(LLMResponse::with_tool_calls(vec![call(
            "c3",
            EVALUATE,
            json!({"companies": [vercel.clone(), vercel.clone()]}),
        )]))
        .agent_turn(LLMResponse::with_tool_calls(vec![call(
            "c4",
            EVALUATE,
            json!({"companies": [vercel]}),
        )]))
        .agent_turn(LLMResponse::text("Found one strong sponsor."))
        .reply(VERCEL_APPROVED)
        .reply(VERCEL_APPROVED);

    let agent = Agent::new(test_config(12), Arc::new(llm), Arc::new(devtools_search()));
    let outcome = agent
        .run("developer tool startups", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.stop, StopReason::Completed);
    assert_eq!(outcome.rounds, 4);
    assert_eq!(outcome.summary, "Found one strong sponsor.");
    let domains: Vec<&str> = outcome.companies.iter().map(|c| c.domain.as_str()).collect();
    assert_eq!(domains, vec!["vercel.com"]);
    assert_eq!(
        outcome.companies[0].rationale.as_deref(),
        Some("Frontend cloud with a student program")
    );
}

#[tokio::test]
async fn test_tool_results_are_fed_back() {
    let llm = Arc::new(
        ScriptedLlm::new()
            .agent_turn(LLMResponse::with_tool_calls(vec![
                call("c1", SEARCH_BY_QUERY, json!({"query": "cloud providers"})),
                call("c2", "browse_web", json!({})),
                call("c3", SEARCH_SIMILAR, json!({})),
            ]))
            .agent_turn(LLMResponse::text("Nothing approved.")),
    );

    let agent = Agent::new(test_config(12), llm.clone(), Arc::new(devtools_search()));
    let outcome = agent
        .run("cloud providers", &CancellationToken::new())
        .await
        .unwrap();
    assert!(outcome.companies.is_empty());

    let requests = llm.agent_requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let tool_messages: Vec<_> = requests[1].iter().filter(|m| m.role == "tool").collect();
    assert_eq!(tool_messages.len(), 3);
    assert_eq!(tool_messages[0].tool_call_id.as_deref(), Some("c1"));
    assert!(tool_messages[0].content.contains("supabase.com"));
    assert_eq!(tool_messages[1].content, "[]");
    assert!(tool_messages[2]
        .content
        .contains("Missing required argument: seed_url"));
}

#[tokio::test]
async fn test_round_ceiling_stops_loop() {
    let search_turn =
        || LLMResponse::with_tool_calls(vec![call("c", SEARCH_BY_QUERY, json!({"query": "ai"}))]);
    let llm = ScriptedLlm::new()
        .agent_turn(search_turn())
        .agent_turn(search_turn())
        .agent_turn(search_turn());

    let agent = Agent::new(test_config(2), Arc::new(llm), Arc::new(devtools_search()));
    let outcome = agent.run("ai startups", &CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.stop, StopReason::MaxRounds);
    assert_eq!(outcome.rounds, 2);
    assert!(outcome.companies.is_empty());
}

#[tokio::test]
async fn test_cancelled_run_returns_partial() {
    let llm = ScriptedLlm::new().agent_turn(LLMResponse::text("unused"));
    let agent = Agent::new(test_config(12), Arc::new(llm), Arc::new(devtools_search()));

    let cancel = CancellationToken::new();
    cancel.cancel();
    let outcome = agent.run("fintech", &cancel).await.unwrap();

    assert_eq!(outcome.stop, StopReason::Cancelled);
    assert_eq!(outcome.rounds, 0);
    assert!(outcome.companies.is_empty());
}

#[tokio::test]
async fn test_search_failure_aborts_run() {
    let llm = ScriptedLlm::new().agent_turn(LLMResponse::with_tool_calls(vec![call(
        "c1",
        SEARCH_BY_QUERY,
        json!({"query": "databases"}),
    )]));
    let search = StaticSearch {
        fail: true,
        ..Default::default()
    };

    let agent = Agent::new(test_config(12), Arc::new(llm), Arc::new(search));
    let result = agent.run("databases", &CancellationToken::new()).await;
    assert!(result.is_err());
}
