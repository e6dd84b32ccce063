// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The advice pipeline: classify, select a template, fill it, render it.
//!
//! One [`AdvicePipeline`] is built per process from configuration. Learned
//! state is not owned here: boosts and confidence offsets are read from the
//! [`LearningContext`] passed into [`AdvicePipeline::advise`].

use std::path::Path;

use nyaya_classifier::{DomainClassifier, DomainPrediction, DomainProfile};
use nyaya_config::NyayaConfig;
use nyaya_config::model::ClassifierConfig;
use nyaya_core::{LegalDomain, NyayaError};
use nyaya_knowledge::{DomainKnowledge, KnowledgeBase};
use nyaya_learning::LearningContext;
use serde::Serialize;
use tracing::{debug, info};

use crate::bundle::AdviceBundle;
use crate::format::{AdviceFormatter, formatter_for};
use crate::strategy::AdviceStrategy;

/// Advice for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub query: String,
    pub prediction: DomainPrediction,
    /// Prediction confidence shifted by the learned domain offset.
    pub confidence: f64,
    pub bundle: AdviceBundle,
    /// The query should be rephrased before the advice is relied on.
    pub needs_clarification: bool,
}

impl Advice {
    pub fn domain(&self) -> LegalDomain {
        self.prediction.domain
    }
}

/// Classifier, knowledge base, strategy, and formatter wired together.
pub struct AdvicePipeline {
    classifier: DomainClassifier,
    knowledge: KnowledgeBase,
    strategy: AdviceStrategy,
    formatter: Box<dyn AdviceFormatter>,
}

fn profile(entry: &DomainKnowledge) -> DomainProfile {
    DomainProfile {
        domain: entry.domain,
        keywords: entry.keywords.clone(),
        examples: entry.examples.clone(),
    }
}

impl AdvicePipeline {
    /// Train the classifier on `knowledge` and assemble a pipeline.
    pub fn new(
        knowledge: KnowledgeBase,
        classifier: &ClassifierConfig,
        strategy: AdviceStrategy,
        formatter: Box<dyn AdviceFormatter>,
    ) -> Result<Self, NyayaError> {
        let profiles: Vec<DomainProfile> = knowledge.domains().iter().map(profile).collect();
        let classifier = DomainClassifier::from_profiles(&profiles, classifier)?;
        info!(
            domains = classifier.domains().count(),
            formatter = formatter.name(),
            "advice pipeline ready"
        );
        Ok(Self {
            classifier,
            knowledge,
            strategy,
            formatter,
        })
    }

    /// Build from configuration, loading `knowledge.path` or the bundled data.
    pub fn from_config(config: &NyayaConfig) -> Result<Self, NyayaError> {
        let knowledge = match &config.knowledge.path {
            Some(path) => KnowledgeBase::from_path(Path::new(path))?,
            None => KnowledgeBase::embedded()?,
        };
        Self::new(
            knowledge,
            &config.classifier,
            AdviceStrategy::from_config(&config.advice),
            formatter_for(config.advice.format),
        )
    }

    /// Replace the formatter, e.g. for a `--format` override.
    pub fn with_formatter(mut self, formatter: Box<dyn AdviceFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn strategy(&self) -> &AdviceStrategy {
        &self.strategy
    }

    pub fn formatter(&self) -> &dyn AdviceFormatter {
        self.formatter.as_ref()
    }

    /// Produce advice for `query` using the learned state in `learning`.
    pub async fn advise(
        &self,
        query: &str,
        learning: &LearningContext,
    ) -> Result<Advice, NyayaError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(NyayaError::Classification("query is empty".to_string()));
        }

        let boosts = learning.boosts().await;
        let prediction = self.classifier.classify(query, &boosts);
        let confidence = learning
            .adjusted_confidence(prediction.domain, prediction.confidence)
            .await;
        let bundle = AdviceBundle::assemble(self.knowledge.entry(prediction.domain), &self.strategy);
        let needs_clarification = prediction.domain == LegalDomain::General
            || confidence < self.strategy.clarification_threshold;

        debug!(
            domain = %prediction.domain,
            base = prediction.confidence,
            confidence,
            needs_clarification,
            "advice assembled"
        );

        Ok(Advice {
            query: query.to_string(),
            prediction,
            confidence,
            bundle,
            needs_clarification,
        })
    }

    /// Render `advice` with the configured formatter.
    pub fn render(&self, advice: &Advice) -> Result<String, NyayaError> {
        self.formatter.format(advice)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use nyaya_config::model::{OutputFormat, PenalCode};
    use nyaya_core::LearningStore;
    use nyaya_learning::{FeedbackInput, InMemoryStore};

    fn learning() -> LearningContext {
        let store: Arc<dyn LearningStore> = Arc::new(InMemoryStore::new());
        LearningContext::new(&NyayaConfig::default(), store)
    }

    fn pipeline() -> AdvicePipeline {
        AdvicePipeline::from_config(&NyayaConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn canonical_queries_reach_their_domain() {
        let pipeline = pipeline();
        let ctx = learning();
        let cases = [
            ("my landlord is not returning my security deposit", LegalDomain::TenantRights),
            ("my employer has not paid my salary for three months", LegalDomain::Employment),
            ("I want to file for divorce from my husband", LegalDomain::FamilyLaw),
        ];
        for (query, expected) in cases {
            let advice = pipeline.advise(query, &ctx).await.unwrap();
            assert_eq!(advice.domain(), expected, "query: {query}");
            assert_eq!(advice.bundle.domain, expected);
            assert!(!advice.needs_clarification, "query: {query}");
        }
    }

    #[tokio::test]
    async fn unrelated_query_falls_back_to_general() {
        let advice = pipeline()
            .advise("what a lovely sunny afternoon", &learning())
            .await
            .unwrap();
        assert_eq!(advice.domain(), LegalDomain::General);
        assert!(advice.needs_clarification);
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let err = pipeline().advise("   ", &learning()).await.unwrap_err();
        assert!(matches!(err, NyayaError::Classification(_)));
    }

    #[tokio::test]
    async fn learned_offset_shifts_confidence() {
        let pipeline = pipeline();
        let ctx = learning();
        let query = "landlord refuses to return deposit after I vacated the flat";

        let before = pipeline.advise(query, &ctx).await.unwrap();
        ctx.apply_feedback(FeedbackInput {
            query: query.to_string(),
            domain: before.domain(),
            base_confidence: before.prediction.confidence,
            feedback: "this is wrong".to_string(),
            learning_rate: 1.0,
            pattern_id: None,
            correct_domain: None,
        })
        .await;
        let after = pipeline.advise(query, &ctx).await.unwrap();

        assert_eq!(after.prediction.confidence, before.prediction.confidence);
        assert!(after.confidence < before.confidence);
    }

    #[tokio::test]
    async fn strategy_controls_penal_numbering() {
        let mut config = NyayaConfig::default();
        config.advice.penal_code = PenalCode::Ipc;
        config.advice.format = OutputFormat::Plain;
        let pipeline = AdvicePipeline::from_config(&config).unwrap();

        let advice = pipeline
            .advise("my landlord is not returning my security deposit", &learning())
            .await
            .unwrap();
        assert!(!advice.bundle.penal_sections.is_empty());
        assert!(
            advice
                .bundle
                .penal_sections
                .iter()
                .all(|s| s.citation.starts_with("IPC "))
        );

        let text = pipeline.render(&advice).unwrap();
        assert!(text.contains("IPC 406"));
        assert_eq!(pipeline.formatter().name(), "plain");
    }

    #[test]
    fn missing_knowledge_file_is_an_error() {
        let mut config = NyayaConfig::default();
        config.knowledge.path = Some("/nonexistent/knowledge.toml".to_string());
        assert!(matches!(
            AdvicePipeline::from_config(&config),
            Err(NyayaError::Knowledge(_))
        ));
    }
}
