// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Nyaya pipeline.
//!
//! Each test creates an isolated TestHarness with a temp SQLite database.
//! Tests are independent and order-insensitive.

use nyaya_agent::ConversationState;
use nyaya_config::model::OutputFormat;
use nyaya_core::{ConversationStore, FeedbackType, LearningStore, LegalDomain};
use nyaya_test_utils::TestHarness;

const TENANT_QUERY: &str = "my landlord is not returning my security deposit";
const TENANT_PARAPHRASE: &str = "landlord refuses to return my deposit";
const EMPLOYMENT_QUERY: &str = "my employer has not paid my salary for three months";

// ---- Advice and pattern memory ----

#[tokio::test]
async fn ask_routes_query_and_records_pattern() {
    let harness = TestHarness::new().await.unwrap();

    let (advice, pattern) = harness.ask(TENANT_QUERY).await.unwrap();
    assert_eq!(advice.domain(), LegalDomain::TenantRights);
    assert!(!advice.bundle.process_steps.is_empty());
    let first = pattern.unwrap();
    assert!(first.created);

    let (_, pattern) = harness.ask(TENANT_PARAPHRASE).await.unwrap();
    let second = pattern.unwrap();
    assert_eq!(second.pattern.id, first.pattern.id);
    assert_eq!(second.pattern.match_count, 2);

    let stored = harness
        .store
        .list_patterns(Some(LegalDomain::TenantRights))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn json_format_renders_parseable_advice() {
    let harness = TestHarness::builder()
        .with_format(OutputFormat::Json)
        .build()
        .await
        .unwrap();

    let (advice, _) = harness.ask(EMPLOYMENT_QUERY).await.unwrap();
    let rendered = harness.pipeline.render(&advice).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["bundle"]["domain"], "employment");
    assert_eq!(value["query"], EMPLOYMENT_QUERY);
}

// ---- Feedback and the improvement log ----

#[tokio::test]
async fn feedback_is_logged_with_pattern() {
    let harness = TestHarness::new().await.unwrap();
    let mut session = harness.session();

    let reply = session.ask(TENANT_QUERY).await.unwrap();
    let pattern_id = reply.pattern.unwrap().pattern.id;
    let rated = session.feedback("this is wrong", None).await.unwrap();
    assert!(rated.outcome.confidence_after < rated.outcome.confidence_before);

    let log = harness.store.recent_improvements(10).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].feedback_type, FeedbackType::Negative);
    assert_eq!(log[0].domain, LegalDomain::TenantRights);
    assert_eq!(log[0].pattern_id.as_deref(), Some(pattern_id.as_str()));
}

#[tokio::test]
async fn feedback_summary_counts_categories() {
    let harness = TestHarness::new().await.unwrap();
    let mut session = harness.session();

    session.ask(TENANT_QUERY).await.unwrap();
    session.feedback("very helpful, thanks", None).await.unwrap();
    session.ask(EMPLOYMENT_QUERY).await.unwrap();
    session.feedback("can you explain the steps", None).await.unwrap();

    let summary = harness.store.feedback_summary().await.unwrap();
    let overall = summary.iter().find(|s| s.domain.is_none()).unwrap();
    assert_eq!(overall.total, 2);
    assert_eq!(overall.positive, 1);
    assert_eq!(overall.clarification, 1);

    let tenant = summary
        .iter()
        .find(|s| s.domain == Some(LegalDomain::TenantRights))
        .unwrap();
    assert_eq!(tenant.positive, 1);
}

// ---- Learned state across restarts ----

#[tokio::test]
async fn persisted_offsets_survive_restart() {
    let mut harness = TestHarness::builder()
        .with_persisted_offsets()
        .build()
        .await
        .unwrap();

    {
        let mut session = harness.session();
        session.ask(TENANT_QUERY).await.unwrap();
        session.feedback("useless", None).await.unwrap();
    }
    let learned = harness.learning.offset(LegalDomain::TenantRights).await;
    assert!(learned < 0.0);

    harness.restart().await.unwrap();
    let restored = harness.learning.offset(LegalDomain::TenantRights).await;
    assert!((restored - learned).abs() < 1e-12);
}

#[tokio::test]
async fn offsets_are_not_persisted_by_default() {
    let mut harness = TestHarness::new().await.unwrap();
    {
        let mut session = harness.session();
        session.ask(TENANT_QUERY).await.unwrap();
        session.feedback("useless", None).await.unwrap();
    }
    assert!(harness.learning.offset(LegalDomain::TenantRights).await < 0.0);

    harness.restart().await.unwrap();
    assert_eq!(harness.learning.offset(LegalDomain::TenantRights).await, 0.0);
    // Patterns are always stored.
    assert_eq!(harness.store.list_patterns(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn persisted_corrections_survive_restart() {
    let mut harness = TestHarness::builder()
        .with_persisted_offsets()
        .build()
        .await
        .unwrap();

    {
        let mut session = harness.session();
        session.ask(TENANT_QUERY).await.unwrap();
        session
            .feedback("wrong area of law", Some(LegalDomain::PropertyDispute))
            .await
            .unwrap();
    }
    let learned = harness.learning.boosts().await;
    assert!(learned[&LegalDomain::PropertyDispute] > 0.0);
    assert!(learned[&LegalDomain::TenantRights] < 0.0);

    harness.restart().await.unwrap();
    assert_eq!(harness.learning.boosts().await, learned);

    let (advice, _) = harness.ask(TENANT_QUERY).await.unwrap();
    let expected = learned[&LegalDomain::PropertyDispute];
    let unboosted = TestHarness::new().await.unwrap();
    let (baseline, _) = unboosted.ask(TENANT_QUERY).await.unwrap();
    let lift = score_of(&advice, LegalDomain::PropertyDispute)
        - score_of(&baseline, LegalDomain::PropertyDispute);
    assert!((lift - expected).abs() < 1e-9);
}

#[tokio::test]
async fn general_queries_leave_no_learned_state() {
    let harness = TestHarness::builder()
        .with_persisted_offsets()
        .build()
        .await
        .unwrap();
    let mut session = harness.session();

    let reply = session.ask("what a lovely sunny afternoon").await.unwrap();
    assert_eq!(reply.advice.domain(), LegalDomain::General);
    assert!(reply.pattern.is_none());

    session.feedback("useless", None).await.unwrap();
    assert_eq!(harness.learning.offset(LegalDomain::General).await, 0.0);
    assert!(harness.store.list_patterns(None).await.unwrap().is_empty());
    assert!(harness.store.load_offsets().await.unwrap().is_empty());

    let log = harness.store.recent_improvements(10).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].domain, LegalDomain::General);
}

// ---- Conversations ----

#[tokio::test]
async fn repeated_negatives_escalate_and_are_persisted() {
    let harness = TestHarness::new().await.unwrap();
    let mut session = harness.session();

    session.ask(TENANT_QUERY).await.unwrap();
    session.feedback("wrong", None).await.unwrap();
    session.ask(EMPLOYMENT_QUERY).await.unwrap();
    let reply = session.feedback("not helpful at all", None).await.unwrap();
    assert_eq!(reply.state, ConversationState::Escalated);

    let stored = harness
        .store
        .get_conversation(session.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.state, "escalated");
    assert_eq!(stored.turn_count, 4);

    let turns = harness.store.get_turns(session.id(), None).await.unwrap();
    assert_eq!(turns.len(), 6);
    let last_two = harness.store.get_turns(session.id(), Some(2)).await.unwrap();
    assert_eq!(last_two[1].kind, "feedback");
    assert_eq!(last_two[1].content, "not helpful at all");
}

#[tokio::test]
async fn turn_limit_closes_persisted_conversation() {
    let harness = TestHarness::builder()
        .with_max_turns(3)
        .build()
        .await
        .unwrap();
    let mut session = harness.session();

    session.ask(TENANT_QUERY).await.unwrap();
    session.feedback("ok", None).await.unwrap();
    let reply = session.ask(EMPLOYMENT_QUERY).await.unwrap();
    assert_eq!(reply.state, ConversationState::Closed);
    assert!(session.feedback("thanks", None).await.is_err());

    let stored = harness
        .store
        .get_conversation(session.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.state, "closed");
}

#[tokio::test]
async fn domain_correction_shifts_future_scores() {
    let harness = TestHarness::new().await.unwrap();
    let mut session = harness.session();

    let before = session.ask(TENANT_QUERY).await.unwrap();
    let property_before = score_of(&before.advice, LegalDomain::PropertyDispute);

    let reply = session
        .feedback("wrong area of law", Some(LegalDomain::PropertyDispute))
        .await
        .unwrap();
    assert_eq!(reply.outcome.corrected_to, Some(LegalDomain::PropertyDispute));

    let after = session.ask(TENANT_QUERY).await.unwrap();
    assert!(score_of(&after.advice, LegalDomain::PropertyDispute) > property_before);
}

fn score_of(advice: &nyaya_agent::Advice, domain: LegalDomain) -> f64 {
    advice
        .prediction
        .scores
        .iter()
        .find(|s| s.domain == domain)
        .map(|s| s.score)
        .unwrap()
}
