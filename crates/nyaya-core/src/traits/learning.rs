// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store interface for the adaptive-confidence and pattern-memory subsystem.

use async_trait::async_trait;

use crate::error::NyayaError;
use crate::traits::adapter::StoreAdapter;
use crate::types::{DomainFeedbackSummary, ImprovementRecord, LegalDomain, QueryPattern};

/// Persistence for query patterns, the improvement log, domain offsets
/// and classifier boosts.
///
/// Implementations assume a single writer. There is no conflict
/// resolution between concurrent processes sharing one backend.
#[async_trait]
pub trait LearningStore: StoreAdapter {
    /// All patterns of a domain, oldest first.
    async fn patterns_for_domain(
        &self,
        domain: LegalDomain,
    ) -> Result<Vec<QueryPattern>, NyayaError>;

    /// Insert a freshly created pattern.
    async fn insert_pattern(&self, pattern: &QueryPattern) -> Result<(), NyayaError>;

    /// Merge one more query into an existing pattern: increments the match
    /// count and folds `confidence` into the running average.
    ///
    /// Returns the updated pattern.
    async fn record_pattern_match(
        &self,
        id: &str,
        confidence: f64,
    ) -> Result<QueryPattern, NyayaError>;

    /// Fetch a single pattern.
    async fn get_pattern(&self, id: &str) -> Result<Option<QueryPattern>, NyayaError>;

    /// List patterns, optionally restricted to one domain, most matched first.
    async fn list_patterns(
        &self,
        domain: Option<LegalDomain>,
    ) -> Result<Vec<QueryPattern>, NyayaError>;

    /// Append a row to the improvement log.
    async fn append_improvement(&self, record: &ImprovementRecord) -> Result<(), NyayaError>;

    /// Most recent improvement rows, newest first.
    async fn recent_improvements(
        &self,
        limit: usize,
    ) -> Result<Vec<ImprovementRecord>, NyayaError>;

    /// Per-domain feedback counts, plus an overall row with `domain: None`.
    async fn feedback_summary(&self) -> Result<Vec<DomainFeedbackSummary>, NyayaError>;

    /// Load persisted domain offsets.
    async fn load_offsets(&self) -> Result<Vec<(LegalDomain, f64)>, NyayaError>;

    /// Persist the current offset for one domain.
    async fn save_offset(&self, domain: LegalDomain, offset: f64) -> Result<(), NyayaError>;

    /// Load persisted classifier boosts learned from domain corrections.
    async fn load_boosts(&self) -> Result<Vec<(LegalDomain, f64)>, NyayaError>;

    /// Persist the current boost for one domain.
    async fn save_boost(&self, domain: LegalDomain, boost: f64) -> Result<(), NyayaError>;
}
