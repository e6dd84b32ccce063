// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-turn conversation state machine.
//!
//! A [`ConversationSession`] alternates between queries and feedback on the
//! last advice. It tracks user satisfaction, decays the learning rate with
//! every rating, and escalates when the user keeps rejecting advice.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use nyaya_config::NyayaConfig;
use nyaya_core::{
    Conversation, ConversationStore, FeedbackType, LegalDomain, NyayaError, Turn, timestamp_now,
};
use nyaya_learning::{FeedbackInput, FeedbackOutcome, LearningContext, PatternMatch};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::pipeline::{Advice, AdvicePipeline};

const INITIAL_SATISFACTION: f64 = 0.5;
const POSITIVE_DELTA: f64 = 0.2;
const NEGATIVE_DELTA: f64 = -0.25;
const CLARIFICATION_DELTA: f64 = -0.1;
/// Applied when a query lands in a pattern already seen in this conversation.
const REPEAT_DELTA: f64 = -0.1;

/// The state of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// Waiting for a query.
    Idle,
    /// Advice was given and can be rated.
    AwaitingFeedback,
    /// The user should rephrase or add detail.
    Clarifying,
    /// The user rejected advice repeatedly; a human should take over.
    Escalated,
    /// No more input is accepted.
    Closed,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Idle => "idle",
            ConversationState::AwaitingFeedback => "awaiting_feedback",
            ConversationState::Clarifying => "clarifying",
            ConversationState::Escalated => "escalated",
            ConversationState::Closed => "closed",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a query turn.
#[derive(Debug, Clone)]
pub struct QueryReply {
    pub advice: Advice,
    /// `None` when pattern memory could not be updated.
    pub pattern: Option<PatternMatch>,
    /// The query matched a pattern already seen in this conversation.
    pub repeated: bool,
    pub state: ConversationState,
}

/// Result of a feedback turn.
#[derive(Debug, Clone)]
pub struct FeedbackReply {
    pub outcome: FeedbackOutcome,
    pub state: ConversationState,
    pub satisfaction: f64,
    /// Learning rate for the next rating.
    pub learning_rate: f64,
}

#[derive(Debug, Clone)]
struct PendingAdvice {
    advice: Advice,
    pattern_id: Option<String>,
}

/// One user's conversation with the assistant.
pub struct ConversationSession {
    id: String,
    state: ConversationState,
    turn_count: usize,
    consecutive_negatives: usize,
    satisfaction: f64,
    learning_rate: f64,
    seen_patterns: HashSet<String>,
    pending: Option<PendingAdvice>,
    created_at: String,

    max_turns: usize,
    escalation_negatives: usize,
    escalation_satisfaction: f64,
    learning_rate_decay: f64,
    min_learning_rate: f64,

    pipeline: Arc<AdvicePipeline>,
    learning: Arc<LearningContext>,
    store: Option<Arc<dyn ConversationStore>>,
    persisted: bool,
}

impl ConversationSession {
    pub fn new(
        config: &NyayaConfig,
        pipeline: Arc<AdvicePipeline>,
        learning: Arc<LearningContext>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            state: ConversationState::Idle,
            turn_count: 0,
            consecutive_negatives: 0,
            satisfaction: INITIAL_SATISFACTION,
            learning_rate: config.learning.initial_learning_rate,
            seen_patterns: HashSet::new(),
            pending: None,
            created_at: timestamp_now(),
            max_turns: config.conversation.max_turns,
            escalation_negatives: config.conversation.escalation_negatives,
            escalation_satisfaction: config.conversation.escalation_satisfaction,
            learning_rate_decay: config.learning.learning_rate_decay,
            min_learning_rate: config.learning.min_learning_rate,
            pipeline,
            learning,
            store: None,
            persisted: false,
        }
    }

    /// Persist the conversation and its turns to `store`.
    pub fn with_store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Queries and ratings received so far.
    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    pub fn satisfaction(&self) -> f64 {
        self.satisfaction
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn consecutive_negatives(&self) -> usize {
        self.consecutive_negatives
    }

    /// The advice that the next feedback will rate.
    pub fn pending_advice(&self) -> Option<&Advice> {
        self.pending.as_ref().map(|p| &p.advice)
    }

    /// Answer a query and wait for feedback on it.
    pub async fn ask(&mut self, query: &str) -> Result<QueryReply, NyayaError> {
        self.ensure_open()?;
        let advice = self.pipeline.advise(query, &self.learning).await?;
        self.turn_count += 1;

        let pattern = self
            .learning
            .observe_query(advice.domain(), &advice.query, advice.prediction.confidence)
            .await;
        let pattern_id = pattern.as_ref().map(|m| m.pattern.id.clone());
        let repeated = pattern_id
            .as_ref()
            .is_some_and(|id| !self.seen_patterns.insert(id.clone()));
        if repeated {
            self.adjust_satisfaction(REPEAT_DELTA);
            debug!(conversation = %self.id, "query repeats an earlier pattern");
        }

        self.state = if advice.needs_clarification {
            ConversationState::Clarifying
        } else {
            ConversationState::AwaitingFeedback
        };
        self.pending = Some(PendingAdvice {
            advice: advice.clone(),
            pattern_id: pattern_id.clone(),
        });
        self.close_if_exhausted();

        self.sync().await;
        self.record_turn(
            "query",
            &advice.query,
            Some(advice.domain()),
            Some(advice.prediction.confidence),
            pattern_id.clone(),
        )
        .await;
        self.record_turn(
            "advice",
            &advice.bundle.title,
            Some(advice.domain()),
            Some(advice.confidence),
            pattern_id,
        )
        .await;

        Ok(QueryReply {
            advice,
            pattern,
            repeated,
            state: self.state,
        })
    }

    /// Rate the pending advice with free-text feedback.
    ///
    /// `correct_domain` records that the query belonged elsewhere.
    pub async fn feedback(
        &mut self,
        text: &str,
        correct_domain: Option<LegalDomain>,
    ) -> Result<FeedbackReply, NyayaError> {
        self.ensure_open()?;
        let Some(pending) = self.pending.take() else {
            return Err(NyayaError::conversation("there is no advice to give feedback on"));
        };
        self.turn_count += 1;

        let domain = pending.advice.domain();
        let outcome = self
            .learning
            .apply_feedback(FeedbackInput {
                query: pending.advice.query.clone(),
                domain,
                base_confidence: pending.advice.prediction.confidence,
                feedback: text.to_string(),
                learning_rate: self.learning_rate,
                pattern_id: pending.pattern_id.clone(),
                correct_domain,
            })
            .await;

        self.state = self.transition(outcome.classification.category);
        self.learning_rate =
            (self.learning_rate * self.learning_rate_decay).max(self.min_learning_rate);
        if self.state == ConversationState::Escalated {
            info!(
                conversation = %self.id,
                negatives = self.consecutive_negatives,
                satisfaction = self.satisfaction,
                "conversation escalated"
            );
        }
        self.close_if_exhausted();

        self.sync().await;
        self.record_turn(
            "feedback",
            text,
            Some(domain),
            Some(outcome.confidence_after),
            pending.pattern_id,
        )
        .await;

        Ok(FeedbackReply {
            outcome,
            state: self.state,
            satisfaction: self.satisfaction,
            learning_rate: self.learning_rate,
        })
    }

    /// End the conversation.
    pub async fn close(&mut self) {
        if self.state != ConversationState::Closed {
            self.state = ConversationState::Closed;
            self.pending = None;
            self.sync().await;
        }
    }

    fn ensure_open(&self) -> Result<(), NyayaError> {
        if self.state == ConversationState::Closed {
            return Err(NyayaError::conversation(format!(
                "conversation {} is closed",
                self.id
            )));
        }
        Ok(())
    }

    fn transition(&mut self, category: FeedbackType) -> ConversationState {
        match category {
            FeedbackType::Positive => {
                self.consecutive_negatives = 0;
                self.adjust_satisfaction(POSITIVE_DELTA);
                ConversationState::Idle
            }
            FeedbackType::Neutral => {
                self.consecutive_negatives = 0;
                ConversationState::Idle
            }
            FeedbackType::Clarification => {
                self.consecutive_negatives = 0;
                self.adjust_satisfaction(CLARIFICATION_DELTA);
                ConversationState::Clarifying
            }
            FeedbackType::Negative => {
                self.consecutive_negatives += 1;
                self.adjust_satisfaction(NEGATIVE_DELTA);
                if self.consecutive_negatives >= self.escalation_negatives
                    || self.satisfaction < self.escalation_satisfaction
                {
                    ConversationState::Escalated
                } else {
                    ConversationState::Clarifying
                }
            }
        }
    }

    fn adjust_satisfaction(&mut self, delta: f64) {
        self.satisfaction = (self.satisfaction + delta).clamp(0.0, 1.0);
    }

    fn close_if_exhausted(&mut self) {
        if self.turn_count >= self.max_turns {
            debug!(conversation = %self.id, turns = self.turn_count, "turn limit reached");
            self.state = ConversationState::Closed;
            self.pending = None;
        }
    }

    fn snapshot(&self) -> Conversation {
        Conversation {
            id: self.id.clone(),
            state: self.state.to_string(),
            turn_count: self.turn_count as i64,
            satisfaction: self.satisfaction,
            learning_rate: self.learning_rate,
            created_at: self.created_at.clone(),
            updated_at: timestamp_now(),
        }
    }

    /// Create or update the stored conversation row.
    async fn sync(&mut self) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let conversation = self.snapshot();
        let result = if self.persisted {
            store.update_conversation(&conversation).await
        } else {
            store.create_conversation(&conversation).await
        };
        match result {
            Ok(()) => self.persisted = true,
            Err(e) => warn!(error = %e, conversation = %self.id, "failed to persist conversation"),
        }
    }

    async fn record_turn(
        &self,
        kind: &str,
        content: &str,
        domain: Option<LegalDomain>,
        confidence: Option<f64>,
        pattern_id: Option<String>,
    ) {
        let Some(store) = &self.store else {
            return;
        };
        if !self.persisted {
            return;
        }
        let turn = Turn {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: self.id.clone(),
            kind: kind.to_string(),
            content: content.to_string(),
            domain,
            confidence,
            pattern_id,
            created_at: timestamp_now(),
        };
        if let Err(e) = store.insert_turn(&turn).await {
            warn!(error = %e, conversation = %self.id, kind, "failed to record turn");
        }
    }
}
