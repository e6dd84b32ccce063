// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Legal-domain classification.
//!
//! Each specialised domain is scored by combining the best TF-IDF cosine
//! similarity between the query and the domain's example queries with the
//! fraction of the domain's keywords found in the query, plus any learned
//! boost. The highest score wins; ties go to the domain declared first in
//! [`LegalDomain`]. A winning score below `min_score` routes to
//! [`LegalDomain::General`].

use std::collections::BTreeMap;

use nyaya_config::model::ClassifierConfig;
use nyaya_core::{LegalDomain, NyayaError};
use serde::Serialize;
use tracing::debug;

use crate::text;
use crate::tfidf::{SparseVector, TfIdfIndex, cosine};

/// Keyword hits at which the keyword component saturates.
const KEYWORD_SATURATION: f64 = 2.0;

/// Training material for one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainProfile {
    pub domain: LegalDomain,
    pub keywords: Vec<String>,
    pub examples: Vec<String>,
}

/// Score of one domain for one query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DomainScore {
    pub domain: LegalDomain,
    pub score: f64,
}

/// Result of classifying a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainPrediction {
    /// Winning domain, or `General` when nothing scored high enough.
    pub domain: LegalDomain,
    /// Winning score clamped to `[0, 1]`, before learned offsets.
    pub confidence: f64,
    /// Scores of every specialised domain in declaration order.
    pub scores: Vec<DomainScore>,
    /// Keywords of the winning domain found in the query.
    pub matched_keywords: Vec<String>,
}

struct DomainModel {
    domain: LegalDomain,
    /// Normalised keywords.
    keywords: Vec<String>,
    examples: Vec<SparseVector>,
}

/// TF-IDF plus keyword classifier over the specialised legal domains.
pub struct DomainClassifier {
    index: TfIdfIndex,
    models: Vec<DomainModel>,
    tfidf_weight: f64,
    keyword_weight: f64,
    min_score: f64,
}

impl DomainClassifier {
    /// Fit a classifier on the given profiles.
    ///
    /// Profiles for `General` are ignored. Fails when no specialised profile
    /// carries an example query.
    pub fn from_profiles(
        profiles: &[DomainProfile],
        config: &ClassifierConfig,
    ) -> Result<Self, NyayaError> {
        let mut profiles: Vec<&DomainProfile> = profiles
            .iter()
            .filter(|p| p.domain != LegalDomain::General)
            .collect();
        profiles.sort_by_key(|p| p.domain);

        let documents: Vec<Vec<String>> = profiles
            .iter()
            .flat_map(|p| p.examples.iter().map(|e| text::terms(e)))
            .collect();
        if documents.is_empty() {
            return Err(NyayaError::Classification(
                "no example queries to train on".to_string(),
            ));
        }

        let index = TfIdfIndex::fit(&documents);
        let models = profiles
            .iter()
            .map(|p| DomainModel {
                domain: p.domain,
                keywords: p
                    .keywords
                    .iter()
                    .map(|k| text::normalize(k))
                    .filter(|k| !k.is_empty())
                    .collect(),
                examples: p
                    .examples
                    .iter()
                    .map(|e| index.transform(&text::terms(e)))
                    .collect(),
            })
            .collect();

        debug!(
            documents = documents.len(),
            vocabulary = index.vocabulary_len(),
            "domain classifier fitted"
        );

        Ok(Self {
            index,
            models,
            tfidf_weight: config.tfidf_weight,
            keyword_weight: config.keyword_weight,
            min_score: config.min_score,
        })
    }

    /// Domains this classifier can predict, excluding `General`.
    pub fn domains(&self) -> impl Iterator<Item = LegalDomain> + '_ {
        self.models.iter().map(|m| m.domain)
    }

    /// Classify `query`, adding `boosts[domain]` to each domain's score.
    pub fn classify(&self, query: &str, boosts: &BTreeMap<LegalDomain, f64>) -> DomainPrediction {
        let vector = self.index.transform(&text::terms(query));
        let padded = text::padded(query);

        let mut scores = Vec::with_capacity(self.models.len());
        let mut best: Option<(usize, f64)> = None;
        for (i, model) in self.models.iter().enumerate() {
            let similarity = model
                .examples
                .iter()
                .map(|example| cosine(&vector, example))
                .fold(0.0, f64::max);
            let hits = model
                .keywords
                .iter()
                .filter(|k| text::contains_phrase(&padded, k))
                .count();
            let keyword_score = (hits as f64 / KEYWORD_SATURATION).min(1.0);
            let boost = boosts.get(&model.domain).copied().unwrap_or(0.0);
            let score = self.tfidf_weight * similarity + self.keyword_weight * keyword_score + boost;

            scores.push(DomainScore {
                domain: model.domain,
                score,
            });
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((i, score));
            }
        }

        let (domain, best_score, matched_keywords) = match best {
            Some((i, score)) if score >= self.min_score => {
                let model = &self.models[i];
                let matched = model
                    .keywords
                    .iter()
                    .filter(|k| text::contains_phrase(&padded, k))
                    .cloned()
                    .collect();
                (model.domain, score, matched)
            }
            Some((_, score)) => (LegalDomain::General, score, Vec::new()),
            None => (LegalDomain::General, 0.0, Vec::new()),
        };

        debug!(domain = %domain, score = best_score, "query classified");
        DomainPrediction {
            domain,
            confidence: best_score.clamp(0.0, 1.0),
            scores,
            matched_keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(domain: LegalDomain, keywords: &[&str], examples: &[&str]) -> DomainProfile {
        DomainProfile {
            domain,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            examples: examples.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn classifier() -> DomainClassifier {
        let profiles = vec![
            profile(
                LegalDomain::Employment,
                &["salary", "employer", "fired"],
                &["my employer has not paid my salary", "I was fired without notice"],
            ),
            profile(
                LegalDomain::TenantRights,
                &["landlord", "deposit", "rent"],
                &["landlord is not returning my security deposit", "landlord increased rent"],
            ),
            profile(
                LegalDomain::CyberCrime,
                &["hacked", "online fraud"],
                &["my account was hacked", "I lost money in online fraud"],
            ),
            profile(LegalDomain::General, &["law"], &["what is the law"]),
        ];
        DomainClassifier::from_profiles(&profiles, &ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn routes_example_queries_to_their_domain() {
        let c = classifier();
        let none = BTreeMap::new();
        assert_eq!(
            c.classify("Landlord won't return my deposit", &none).domain,
            LegalDomain::TenantRights
        );
        assert_eq!(
            c.classify("Company fired me and kept my wages", &none).domain,
            LegalDomain::Employment
        );
        assert_eq!(
            c.classify("someone hacked my email", &none).domain,
            LegalDomain::CyberCrime
        );
    }

    #[test]
    fn unrelated_query_falls_back_to_general() {
        let c = classifier();
        let prediction = c.classify("what is the weather today", &BTreeMap::new());
        assert_eq!(prediction.domain, LegalDomain::General);
        assert!(prediction.matched_keywords.is_empty());
    }

    #[test]
    fn scores_follow_declaration_order_and_skip_general() {
        let c = classifier();
        let prediction = c.classify("deposit", &BTreeMap::new());
        let order: Vec<_> = prediction.scores.iter().map(|s| s.domain).collect();
        assert_eq!(
            order,
            [LegalDomain::TenantRights, LegalDomain::Employment, LegalDomain::CyberCrime]
        );
        assert_eq!(c.domains().count(), 3);
    }

    #[test]
    fn ties_go_to_the_earlier_domain() {
        let c = classifier();
        let prediction = c.classify("", &BTreeMap::new());
        assert!(prediction.scores.iter().all(|s| s.score == 0.0));

        let mut boosts = BTreeMap::new();
        boosts.insert(LegalDomain::Employment, 0.5);
        boosts.insert(LegalDomain::TenantRights, 0.5);
        assert_eq!(c.classify("", &boosts).domain, LegalDomain::TenantRights);
    }

    #[test]
    fn boosts_shift_the_decision() {
        let c = classifier();
        let query = "question about my salary";
        assert_eq!(c.classify(query, &BTreeMap::new()).domain, LegalDomain::Employment);

        let mut boosts = BTreeMap::new();
        boosts.insert(LegalDomain::CyberCrime, 1.0);
        assert_eq!(c.classify(query, &boosts).domain, LegalDomain::CyberCrime);
    }

    #[test]
    fn matched_keywords_are_reported_and_confidence_is_bounded() {
        let c = classifier();
        let prediction = c.classify("online fraud, my bank account got hacked", &BTreeMap::new());
        assert_eq!(prediction.domain, LegalDomain::CyberCrime);
        assert_eq!(prediction.matched_keywords, ["hacked", "online fraud"]);
        assert!((0.0..=1.0).contains(&prediction.confidence));
    }

    #[test]
    fn empty_training_set_is_rejected() {
        let result = DomainClassifier::from_profiles(&[], &ClassifierConfig::default());
        assert!(matches!(result, Err(NyayaError::Classification(_))));
    }
}
