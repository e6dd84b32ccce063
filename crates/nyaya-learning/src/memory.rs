// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local store for tests and ephemeral sessions.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use nyaya_core::{
    Conversation, ConversationStore, DomainFeedbackSummary, FeedbackType, HealthStatus,
    ImprovementRecord, LearningStore, LegalDomain, NyayaError, QueryPattern, StoreAdapter, Turn,
    timestamp_now,
};

#[derive(Default)]
struct Inner {
    patterns: Vec<QueryPattern>,
    improvements: Vec<ImprovementRecord>,
    offsets: BTreeMap<LegalDomain, f64>,
    boosts: BTreeMap<LegalDomain, f64>,
    conversations: HashMap<String, Conversation>,
    turns: Vec<Turn>,
}

/// Keeps everything in memory; state is lost when the store is dropped.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn summarize(domain: Option<LegalDomain>, records: &[&ImprovementRecord]) -> DomainFeedbackSummary {
    let count = |kind: FeedbackType| records.iter().filter(|r| r.feedback_type == kind).count() as i64;
    let avg_confidence_delta = if records.is_empty() {
        0.0
    } else {
        records
            .iter()
            .map(|r| r.confidence_after - r.confidence_before)
            .sum::<f64>()
            / records.len() as f64
    };
    DomainFeedbackSummary {
        domain,
        total: records.len() as i64,
        positive: count(FeedbackType::Positive),
        negative: count(FeedbackType::Negative),
        clarification: count(FeedbackType::Clarification),
        neutral: count(FeedbackType::Neutral),
        avg_confidence_delta,
    }
}

#[async_trait]
impl StoreAdapter for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> Result<HealthStatus, NyayaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn close(&self) -> Result<(), NyayaError> {
        Ok(())
    }
}

#[async_trait]
impl LearningStore for InMemoryStore {
    async fn patterns_for_domain(
        &self,
        domain: LegalDomain,
    ) -> Result<Vec<QueryPattern>, NyayaError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .patterns
            .iter()
            .filter(|p| p.domain == domain)
            .cloned()
            .collect())
    }

    async fn insert_pattern(&self, pattern: &QueryPattern) -> Result<(), NyayaError> {
        let mut inner = self.inner.lock().await;
        if inner.patterns.iter().any(|p| p.id == pattern.id) {
            return Err(NyayaError::storage(std::io::Error::other(format!(
                "duplicate pattern id {}",
                pattern.id
            ))));
        }
        inner.patterns.push(pattern.clone());
        Ok(())
    }

    async fn record_pattern_match(
        &self,
        id: &str,
        confidence: f64,
    ) -> Result<QueryPattern, NyayaError> {
        let mut inner = self.inner.lock().await;
        let pattern = inner
            .patterns
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| NyayaError::NotFound {
                entity: "pattern",
                id: id.to_string(),
            })?;
        let count = pattern.match_count as f64;
        pattern.avg_confidence = (pattern.avg_confidence * count + confidence) / (count + 1.0);
        pattern.match_count += 1;
        pattern.updated_at = timestamp_now();
        Ok(pattern.clone())
    }

    async fn get_pattern(&self, id: &str) -> Result<Option<QueryPattern>, NyayaError> {
        let inner = self.inner.lock().await;
        Ok(inner.patterns.iter().find(|p| p.id == id).cloned())
    }

    async fn list_patterns(
        &self,
        domain: Option<LegalDomain>,
    ) -> Result<Vec<QueryPattern>, NyayaError> {
        let inner = self.inner.lock().await;
        let mut patterns: Vec<QueryPattern> = inner
            .patterns
            .iter()
            .filter(|p| domain.is_none_or(|d| p.domain == d))
            .cloned()
            .collect();
        // Stable sort keeps creation order among equal counts.
        patterns.sort_by(|a, b| b.match_count.cmp(&a.match_count));
        Ok(patterns)
    }

    async fn append_improvement(&self, record: &ImprovementRecord) -> Result<(), NyayaError> {
        self.inner.lock().await.improvements.push(record.clone());
        Ok(())
    }

    async fn recent_improvements(
        &self,
        limit: usize,
    ) -> Result<Vec<ImprovementRecord>, NyayaError> {
        let inner = self.inner.lock().await;
        Ok(inner.improvements.iter().rev().take(limit).cloned().collect())
    }

    async fn feedback_summary(&self) -> Result<Vec<DomainFeedbackSummary>, NyayaError> {
        let inner = self.inner.lock().await;
        let mut by_domain: BTreeMap<&str, (LegalDomain, Vec<&ImprovementRecord>)> = BTreeMap::new();
        for record in &inner.improvements {
            by_domain
                .entry(record.domain.as_str())
                .or_insert_with(|| (record.domain, Vec::new()))
                .1
                .push(record);
        }
        let mut summaries: Vec<DomainFeedbackSummary> = by_domain
            .values()
            .map(|(domain, records)| summarize(Some(*domain), records))
            .collect();
        let all: Vec<&ImprovementRecord> = inner.improvements.iter().collect();
        summaries.push(summarize(None, &all));
        Ok(summaries)
    }

    async fn load_offsets(&self) -> Result<Vec<(LegalDomain, f64)>, NyayaError> {
        let inner = self.inner.lock().await;
        Ok(inner.offsets.iter().map(|(d, o)| (*d, *o)).collect())
    }

    async fn save_offset(&self, domain: LegalDomain, offset: f64) -> Result<(), NyayaError> {
        self.inner.lock().await.offsets.insert(domain, offset);
        Ok(())
    }

    async fn load_boosts(&self) -> Result<Vec<(LegalDomain, f64)>, NyayaError> {
        let inner = self.inner.lock().await;
        Ok(inner.boosts.iter().map(|(d, b)| (*d, *b)).collect())
    }

    async fn save_boost(&self, domain: LegalDomain, boost: f64) -> Result<(), NyayaError> {
        self.inner.lock().await.boosts.insert(domain, boost);
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    async fn create_conversation(&self, conversation: &Conversation) -> Result<(), NyayaError> {
        self.inner
            .lock()
            .await
            .conversations
            .insert(conversation.id.clone(), conversation.clone());
        Ok(())
    }

    async fn update_conversation(&self, conversation: &Conversation) -> Result<(), NyayaError> {
        let mut inner = self.inner.lock().await;
        match inner.conversations.get_mut(&conversation.id) {
            Some(existing) => {
                *existing = conversation.clone();
                Ok(())
            }
            None => Err(NyayaError::NotFound {
                entity: "conversation",
                id: conversation.id.clone(),
            }),
        }
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, NyayaError> {
        Ok(self.inner.lock().await.conversations.get(id).cloned())
    }

    async fn insert_turn(&self, turn: &Turn) -> Result<(), NyayaError> {
        let mut inner = self.inner.lock().await;
        if !inner.conversations.contains_key(&turn.conversation_id) {
            return Err(NyayaError::NotFound {
                entity: "conversation",
                id: turn.conversation_id.clone(),
            });
        }
        inner.turns.push(turn.clone());
        Ok(())
    }

    async fn get_turns(
        &self,
        conversation_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Turn>, NyayaError> {
        let inner = self.inner.lock().await;
        let turns: Vec<Turn> = inner
            .turns
            .iter()
            .filter(|t| t.conversation_id == conversation_id)
            .cloned()
            .collect();
        let skip = match limit {
            Some(n) if n >= 0 => turns.len().saturating_sub(n as usize),
            _ => 0,
        };
        Ok(turns.into_iter().skip(skip).collect())
    }
}
