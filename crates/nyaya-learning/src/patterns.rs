// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grouping of similar queries into persisted patterns.

use std::collections::HashSet;

use nyaya_classifier::text::extract_keywords;
use nyaya_config::model::PatternConfig;
use nyaya_core::{LearningStore, LegalDomain, NyayaError, QueryPattern, timestamp_now};
use serde::Serialize;
use tracing::debug;

/// Jaccard similarity of two keyword sets.
///
/// Two empty sets are identical (1.0); one empty set shares nothing (0.0).
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    match (a.is_empty(), b.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let intersection = a.intersection(&b).count() as f64;
            let union = a.union(&b).count() as f64;
            intersection / union
        }
    }
}

/// Where an observed query landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternMatch {
    /// The pattern after the observation was applied.
    pub pattern: QueryPattern,
    /// Similarity to the merged pattern, 1.0 for a new one.
    pub similarity: f64,
    /// Whether a new pattern was created.
    pub created: bool,
}

/// Merges queries into the most similar pattern of their domain.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    similarity_threshold: f64,
    max_keywords: usize,
}

impl PatternMatcher {
    pub fn new(similarity_threshold: f64, max_keywords: usize) -> Self {
        Self {
            similarity_threshold,
            max_keywords,
        }
    }

    pub fn from_config(config: &PatternConfig) -> Self {
        Self::new(config.similarity_threshold, config.max_keywords)
    }

    /// Keywords this matcher would store for `query`.
    pub fn keywords(&self, query: &str) -> Vec<String> {
        extract_keywords(query, self.max_keywords)
    }

    /// The pattern of `domain` that `query` would merge into, if any.
    ///
    /// The most similar pattern wins, the oldest on ties; it must reach the
    /// similarity threshold. Nothing is written.
    pub async fn find(
        &self,
        store: &dyn LearningStore,
        domain: LegalDomain,
        query: &str,
    ) -> Result<Option<(QueryPattern, f64)>, NyayaError> {
        let keywords = self.keywords(query);
        let candidates = store.patterns_for_domain(domain).await?;
        Ok(self
            .best_candidate(&keywords, candidates)
            .filter(|(_, similarity)| *similarity >= self.similarity_threshold))
    }

    fn best_candidate(
        &self,
        keywords: &[String],
        candidates: Vec<QueryPattern>,
    ) -> Option<(QueryPattern, f64)> {
        let mut best: Option<(QueryPattern, f64)> = None;
        for pattern in candidates {
            let score = jaccard(keywords, &pattern.keywords);
            if best.as_ref().is_none_or(|(_, top)| score > *top) {
                best = Some((pattern, score));
            }
        }
        best
    }

    /// Record `query` against the patterns of `domain`.
    ///
    /// The most similar pattern wins, the oldest on ties. A similarity of at
    /// least the threshold merges into it; otherwise a new pattern is
    /// inserted with a match count of one.
    pub async fn observe(
        &self,
        store: &dyn LearningStore,
        domain: LegalDomain,
        query: &str,
        confidence: f64,
    ) -> Result<PatternMatch, NyayaError> {
        let keywords = self.keywords(query);
        let candidates = store.patterns_for_domain(domain).await?;

        if let Some((pattern, similarity)) = self.best_candidate(&keywords, candidates) {
            if similarity >= self.similarity_threshold {
                let merged = store.record_pattern_match(&pattern.id, confidence).await?;
                debug!(
                    pattern_id = %merged.id,
                    similarity,
                    match_count = merged.match_count,
                    "query merged into pattern"
                );
                return Ok(PatternMatch {
                    pattern: merged,
                    similarity,
                    created: false,
                });
            }
        }

        let now = timestamp_now();
        let pattern = QueryPattern {
            id: uuid::Uuid::new_v4().to_string(),
            domain,
            keywords,
            match_count: 1,
            avg_confidence: confidence,
            created_at: now.clone(),
            updated_at: now,
        };
        store.insert_pattern(&pattern).await?;
        debug!(pattern_id = %pattern.id, domain = %domain, "new query pattern");
        Ok(PatternMatch {
            pattern,
            similarity: 1.0,
            created: true,
        })
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::from_config(&PatternConfig::default())
    }
}
