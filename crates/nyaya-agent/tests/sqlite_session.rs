// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation sessions backed by the SQLite store.

use std::sync::Arc;

use nyaya_agent::{AdvicePipeline, ConversationSession, ConversationState};
use nyaya_config::NyayaConfig;
use nyaya_core::{ConversationStore, LearningStore, LegalDomain};
use nyaya_learning::LearningContext;
use nyaya_storage::SqliteStore;

async fn stack(dir: &tempfile::TempDir) -> (NyayaConfig, Arc<SqliteStore>, Arc<LearningContext>) {
    let mut config = NyayaConfig::default();
    config.storage.database_path = dir.path().join("agent.db").to_string_lossy().to_string();
    let store = Arc::new(SqliteStore::open(config.storage.clone()).await.unwrap());
    let learning_store: Arc<dyn LearningStore> = store.clone();
    let learning = Arc::new(LearningContext::new(&config, learning_store));
    (config, store, learning)
}

#[tokio::test]
async fn session_writes_conversation_rows() {
    let dir = tempfile::tempdir().unwrap();
    let (config, store, learning) = stack(&dir).await;
    let pipeline = Arc::new(AdvicePipeline::from_config(&config).unwrap());
    let conversations: Arc<dyn ConversationStore> = store.clone();
    let mut session = ConversationSession::new(&config, pipeline, learning).with_store(conversations);

    let reply = session
        .ask("someone hacked my instagram account and is asking for money")
        .await
        .unwrap();
    assert_eq!(reply.advice.domain(), LegalDomain::CyberCrime);
    assert_eq!(reply.state, ConversationState::AwaitingFeedback);

    session.feedback("thank you, that is clear", None).await.unwrap();
    assert_eq!(session.state(), ConversationState::Idle);

    let stored = store.get_conversation(session.id()).await.unwrap().unwrap();
    assert_eq!(stored.state, "idle");
    assert!((stored.satisfaction - 0.7).abs() < 1e-9);
    assert!((stored.learning_rate - 0.9).abs() < 1e-9);

    let turns = store.get_turns(session.id(), None).await.unwrap();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1].kind, "advice");
    assert_eq!(turns[2].pattern_id, turns[0].pattern_id);
    assert!(turns[0].pattern_id.is_some());
}

#[tokio::test]
async fn two_sessions_share_pattern_memory() {
    let dir = tempfile::tempdir().unwrap();
    let (config, store, learning) = stack(&dir).await;
    let pipeline = Arc::new(AdvicePipeline::from_config(&config).unwrap());

    let mut first = ConversationSession::new(&config, pipeline.clone(), learning.clone());
    let mut second = ConversationSession::new(&config, pipeline, learning);

    let a = first
        .ask("my employer has not paid my salary for three months")
        .await
        .unwrap();
    let b = second
        .ask("employer has not paid salary for two months")
        .await
        .unwrap();

    let a_id = a.pattern.unwrap().pattern.id;
    let b_match = b.pattern.unwrap();
    assert_eq!(b_match.pattern.id, a_id);
    assert_eq!(b_match.pattern.match_count, 2);
    // Repeats are tracked per conversation.
    assert!(!b.repeated);

    let patterns = store.list_patterns(Some(LegalDomain::Employment)).await.unwrap();
    assert_eq!(patterns.len(), 1);
}
