// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks ranges and sign constraints that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::NyayaConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation instead of stopping at the first one.
pub fn validate_config(config: &NyayaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        fail(format!(
            "agent.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.agent.log_level
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let classifier = &config.classifier;
    if classifier.tfidf_weight < 0.0 || classifier.keyword_weight < 0.0 {
        fail("classifier weights must be non-negative".to_string());
    }
    if classifier.tfidf_weight + classifier.keyword_weight <= 0.0 {
        fail("classifier.tfidf_weight and classifier.keyword_weight must not both be zero".to_string());
    }
    if !(0.0..1.0).contains(&classifier.min_score) {
        fail(format!(
            "classifier.min_score must be in [0, 1), got {}",
            classifier.min_score
        ));
    }

    let learning = &config.learning;
    if !(learning.alpha > 0.0 && learning.alpha <= 1.0) {
        fail(format!("learning.alpha must be in (0, 1], got {}", learning.alpha));
    }
    if !(learning.max_offset > 0.0 && learning.max_offset <= 1.0) {
        fail(format!(
            "learning.max_offset must be in (0, 1], got {}",
            learning.max_offset
        ));
    }
    if learning.correction_boost < 0.0 {
        fail(format!(
            "learning.correction_boost must be non-negative, got {}",
            learning.correction_boost
        ));
    }
    if !(learning.learning_rate_decay > 0.0 && learning.learning_rate_decay <= 1.0) {
        fail(format!(
            "learning.learning_rate_decay must be in (0, 1], got {}",
            learning.learning_rate_decay
        ));
    }
    if learning.min_learning_rate <= 0.0 || learning.min_learning_rate > learning.initial_learning_rate
    {
        fail(format!(
            "learning.min_learning_rate must be in (0, initial_learning_rate], got {}",
            learning.min_learning_rate
        ));
    }

    let rewards = &config.feedback;
    if rewards.positive < 0.0 {
        fail(format!("feedback.positive must be >= 0, got {}", rewards.positive));
    }
    if rewards.negative > 0.0 {
        fail(format!("feedback.negative must be <= 0, got {}", rewards.negative));
    }
    if rewards.clarification > 0.0 {
        fail(format!(
            "feedback.clarification must be <= 0, got {}",
            rewards.clarification
        ));
    }

    if !(config.patterns.similarity_threshold > 0.0 && config.patterns.similarity_threshold <= 1.0)
    {
        fail(format!(
            "patterns.similarity_threshold must be in (0, 1], got {}",
            config.patterns.similarity_threshold
        ));
    }
    if config.patterns.max_keywords == 0 {
        fail("patterns.max_keywords must be at least 1".to_string());
    }

    if config.conversation.max_turns < 2 {
        fail(format!(
            "conversation.max_turns must be at least 2, got {}",
            config.conversation.max_turns
        ));
    }
    if config.conversation.escalation_negatives == 0 {
        fail("conversation.escalation_negatives must be at least 1".to_string());
    }

    if !(0.0..=1.0).contains(&config.advice.clarification_threshold) {
        fail(format!(
            "advice.clarification_threshold must be in [0, 1], got {}",
            config.advice.clarification_threshold
        ));
    }

    if let Some(path) = &config.knowledge.path {
        if path.trim().is_empty() {
            fail("knowledge.path must not be empty when set".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &NyayaConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&NyayaConfig::default()).is_ok());
    }

    #[test]
    fn positive_negative_reward_is_rejected() {
        let mut config = NyayaConfig::default();
        config.feedback.negative = 0.1;
        assert!(messages(&config).iter().any(|m| m.contains("feedback.negative")));
    }

    #[test]
    fn alpha_out_of_range_is_rejected() {
        let mut config = NyayaConfig::default();
        config.learning.alpha = 1.5;
        assert!(messages(&config).iter().any(|m| m.contains("learning.alpha")));
    }

    #[test]
    fn zero_alpha_is_rejected() {
        let mut config = NyayaConfig::default();
        config.learning.alpha = 0.0;
        assert!(messages(&config).iter().any(|m| m.contains("learning.alpha")));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = NyayaConfig::default();
        config.storage.database_path = " ".to_string();
        config.patterns.max_keywords = 0;
        config.agent.log_level = "loud".to_string();
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 3, "got {msgs:?}");
    }

    #[test]
    fn min_learning_rate_above_initial_is_rejected() {
        let mut config = NyayaConfig::default();
        config.learning.min_learning_rate = 2.0;
        assert!(messages(&config).iter().any(|m| m.contains("min_learning_rate")));
    }

    #[test]
    fn empty_knowledge_path_is_rejected() {
        let mut config = NyayaConfig::default();
        config.knowledge.path = Some(String::new());
        assert!(messages(&config).iter().any(|m| m.contains("knowledge.path")));
    }
}
