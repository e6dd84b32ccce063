// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-process learning context.
//!
//! [`LearningContext`] owns the adaptive state (confidence offsets, domain
//! boosts) and delegates persistence to an injected [`LearningStore`].
//! Store failures are logged and never abort a request: a broken database
//! degrades learning, not advice.

use std::collections::BTreeMap;
use std::sync::Arc;

use nyaya_classifier::{FeedbackClassification, FeedbackClassifier, RewardTable};
use nyaya_config::NyayaConfig;
use nyaya_core::{ImprovementRecord, LearningStore, LegalDomain, QueryPattern, timestamp_now};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::offsets::{ConfidenceOffsets, DomainBoosts};
use crate::patterns::{PatternMatch, PatternMatcher};

/// Feedback on one piece of advice.
#[derive(Debug, Clone)]
pub struct FeedbackInput {
    /// The query the advice answered.
    pub query: String,
    /// Domain the advice was given for.
    pub domain: LegalDomain,
    /// Classifier confidence before any learned offset.
    pub base_confidence: f64,
    /// Free-text feedback.
    pub feedback: String,
    /// Scales the reward; conversations decay it over time.
    pub learning_rate: f64,
    pub pattern_id: Option<String>,
    /// The domain the user says the query belongs to, if different.
    pub correct_domain: Option<LegalDomain>,
}

/// What applying feedback changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackOutcome {
    pub classification: FeedbackClassification,
    /// `reward * learning_rate`.
    pub adjustment: f64,
    /// Domain offset after the update.
    pub offset: f64,
    pub confidence_before: f64,
    pub confidence_after: f64,
    /// Set when a domain correction was applied.
    pub corrected_to: Option<LegalDomain>,
}

/// Adaptive state shared by every request of one process.
pub struct LearningContext {
    offsets: Mutex<ConfidenceOffsets>,
    boosts: Mutex<DomainBoosts>,
    matcher: PatternMatcher,
    feedback: FeedbackClassifier,
    store: Arc<dyn LearningStore>,
    persist_offsets: bool,
}

impl LearningContext {
    pub fn new(config: &NyayaConfig, store: Arc<dyn LearningStore>) -> Self {
        Self {
            offsets: Mutex::new(ConfidenceOffsets::from_config(&config.learning)),
            boosts: Mutex::new(DomainBoosts::from_config(&config.learning)),
            matcher: PatternMatcher::from_config(&config.patterns),
            feedback: FeedbackClassifier::new(RewardTable::from(&config.feedback)),
            store,
            persist_offsets: config.learning.persist_offsets,
        }
    }

    /// Load persisted offsets and classifier boosts when persistence is
    /// enabled.
    ///
    /// Returns the number of values restored.
    pub async fn restore(&self) -> usize {
        if !self.persist_offsets {
            return 0;
        }
        let mut restored = 0;
        match self.store.load_offsets().await {
            Ok(saved) => {
                let mut offsets = self.offsets.lock().await;
                for (domain, value) in &saved {
                    offsets.set(*domain, *value);
                }
                info!(count = saved.len(), "restored confidence offsets");
                restored += saved.len();
            }
            Err(e) => warn!(error = %e, "failed to load confidence offsets"),
        }
        match self.store.load_boosts().await {
            Ok(saved) => {
                let mut boosts = self.boosts.lock().await;
                for (domain, value) in &saved {
                    boosts.set(*domain, *value);
                }
                info!(count = saved.len(), "restored classifier boosts");
                restored += saved.len();
            }
            Err(e) => warn!(error = %e, "failed to load classifier boosts"),
        }
        restored
    }

    pub fn store(&self) -> &Arc<dyn LearningStore> {
        &self.store
    }

    pub fn feedback_classifier(&self) -> &FeedbackClassifier {
        &self.feedback
    }

    pub fn pattern_matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// Snapshot of the learned classifier boosts.
    pub async fn boosts(&self) -> BTreeMap<LegalDomain, f64> {
        self.boosts.lock().await.as_map().clone()
    }

    pub async fn offset(&self, domain: LegalDomain) -> f64 {
        self.offsets.lock().await.get(domain)
    }

    /// Current offsets of every domain that has one.
    pub async fn offsets(&self) -> Vec<(LegalDomain, f64)> {
        self.offsets.lock().await.iter().collect()
    }

    /// `base` shifted by the learned offset of `domain`, within `[0, 1]`.
    pub async fn adjusted_confidence(&self, domain: LegalDomain, base: f64) -> f64 {
        self.offsets.lock().await.adjusted(domain, base)
    }

    pub fn classify_feedback(&self, text: &str) -> FeedbackClassification {
        self.feedback.classify(text)
    }

    /// Record `query` in the pattern memory of `domain`.
    ///
    /// Returns `None` for `General`, which keeps no patterns, and when the
    /// store fails.
    pub async fn observe_query(
        &self,
        domain: LegalDomain,
        query: &str,
        confidence: f64,
    ) -> Option<PatternMatch> {
        if domain == LegalDomain::General {
            debug!("general query not recorded in pattern memory");
            return None;
        }
        match self
            .matcher
            .observe(self.store.as_ref(), domain, query, confidence)
            .await
        {
            Ok(found) => Some(found),
            Err(e) => {
                warn!(error = %e, domain = %domain, "failed to record query pattern");
                None
            }
        }
    }

    /// The stored pattern `query` belongs to, without recording a match.
    pub async fn find_pattern(&self, domain: LegalDomain, query: &str) -> Option<QueryPattern> {
        if domain == LegalDomain::General {
            return None;
        }
        match self.matcher.find(self.store.as_ref(), domain, query).await {
            Ok(found) => found.map(|(pattern, _)| pattern),
            Err(e) => {
                warn!(error = %e, domain = %domain, "failed to look up query pattern");
                None
            }
        }
    }

    /// Classify feedback, update the domain offset and log the improvement.
    ///
    /// Feedback on `General` advice is logged but trains no offset.
    pub async fn apply_feedback(&self, input: FeedbackInput) -> FeedbackOutcome {
        let classification = self.feedback.classify(&input.feedback);
        let adjustment = classification.reward * input.learning_rate;
        let trainable = input.domain != LegalDomain::General;

        let (offset, confidence_before, confidence_after) = {
            let mut offsets = self.offsets.lock().await;
            let before = offsets.adjusted(input.domain, input.base_confidence);
            let offset = if trainable {
                offsets.update(input.domain, adjustment)
            } else {
                offsets.get(input.domain)
            };
            let after = offsets.adjusted(input.domain, input.base_confidence);
            (offset, before, after)
        };

        let (corrected_to, changed_boosts) = match input.correct_domain {
            Some(correct) if correct != input.domain => {
                let changed = self
                    .boosts
                    .lock()
                    .await
                    .apply_correction(input.domain, correct);
                info!(from = %input.domain, to = %correct, "applied domain correction");
                (Some(correct), changed)
            }
            _ => (None, Vec::new()),
        };

        debug!(
            domain = %input.domain,
            category = %classification.category,
            adjustment,
            offset,
            "feedback applied"
        );

        let record = ImprovementRecord {
            id: uuid::Uuid::new_v4().to_string(),
            query: input.query,
            domain: input.domain,
            confidence_before,
            confidence_after,
            feedback_type: classification.category,
            pattern_id: input.pattern_id,
            created_at: timestamp_now(),
        };
        if let Err(e) = self.store.append_improvement(&record).await {
            warn!(error = %e, "failed to append improvement record");
        }

        if self.persist_offsets {
            if trainable {
                if let Err(e) = self.store.save_offset(input.domain, offset).await {
                    warn!(error = %e, domain = %input.domain, "failed to persist confidence offset");
                }
            }
            for (domain, boost) in changed_boosts {
                if let Err(e) = self.store.save_boost(domain, boost).await {
                    warn!(error = %e, domain = %domain, "failed to persist classifier boost");
                }
            }
        }

        FeedbackOutcome {
            classification,
            adjustment,
            offset,
            confidence_before,
            confidence_after,
            corrected_to,
        }
    }
}
