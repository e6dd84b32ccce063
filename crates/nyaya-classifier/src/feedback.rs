// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-based feedback sentiment classification.
//!
//! Phrase sets are checked in a fixed order (negative, clarification,
//! positive, neutral) and the first category with a matching phrase wins,
//! so "not helpful" can never be read as "helpful".

use nyaya_config::model::FeedbackConfig;
use nyaya_core::FeedbackType;
use serde::Serialize;

use crate::text;

const NEGATIVE: &[&str] = &[
    "not helpful",
    "not useful",
    "unhelpful",
    "useless",
    "wrong",
    "incorrect",
    "not correct",
    "not right",
    "not good",
    "bad",
    "poor",
    "terrible",
    "didnt help",
    "did not help",
    "doesnt help",
    "not relevant",
    "irrelevant",
    "waste",
    "not satisfied",
    "dissatisfied",
    "no use",
];

const CLARIFICATION: &[&str] = &[
    "what do you mean",
    "can you explain",
    "explain",
    "clarify",
    "confused",
    "confusing",
    "dont understand",
    "do not understand",
    "not clear",
    "unclear",
    "more detail",
    "more details",
    "elaborate",
    "what about",
    "how do i",
];

const POSITIVE: &[&str] = &[
    "helpful",
    "useful",
    "thanks",
    "thank you",
    "great",
    "good",
    "perfect",
    "excellent",
    "clear",
    "makes sense",
    "solved",
    "exactly",
    "correct",
    "right",
    "awesome",
    "appreciate",
];

const NEUTRAL: &[&str] = &["ok", "okay", "noted", "i see", "hmm", "fine", "sure"];

const CHECK_ORDER: &[(FeedbackType, &[&str])] = &[
    (FeedbackType::Negative, NEGATIVE),
    (FeedbackType::Clarification, CLARIFICATION),
    (FeedbackType::Positive, POSITIVE),
    (FeedbackType::Neutral, NEUTRAL),
];

/// Base reward per feedback category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RewardTable {
    pub positive: f64,
    pub negative: f64,
    pub clarification: f64,
    pub neutral: f64,
    /// Reward when no phrase matched at all.
    pub unmatched: f64,
}

impl RewardTable {
    /// Reward for a category, distinguishing an unmatched neutral.
    pub fn reward(&self, category: FeedbackType, matched: bool) -> f64 {
        match (category, matched) {
            (_, false) => self.unmatched,
            (FeedbackType::Positive, true) => self.positive,
            (FeedbackType::Negative, true) => self.negative,
            (FeedbackType::Clarification, true) => self.clarification,
            (FeedbackType::Neutral, true) => self.neutral,
        }
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        Self::from(&FeedbackConfig::default())
    }
}

impl From<&FeedbackConfig> for RewardTable {
    fn from(config: &FeedbackConfig) -> Self {
        Self {
            positive: config.positive,
            negative: config.negative,
            clarification: config.clarification,
            neutral: config.neutral,
            unmatched: config.unmatched,
        }
    }
}

/// Outcome of classifying one feedback message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackClassification {
    pub category: FeedbackType,
    /// The phrase that decided the category, `None` when nothing matched.
    pub matched: Option<&'static str>,
    pub reward: f64,
}

/// Classifies free-text feedback against fixed phrase sets.
#[derive(Debug, Clone, Default)]
pub struct FeedbackClassifier {
    rewards: RewardTable,
}

impl FeedbackClassifier {
    pub fn new(rewards: RewardTable) -> Self {
        Self { rewards }
    }

    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    pub fn classify(&self, feedback: &str) -> FeedbackClassification {
        let padded = text::padded(feedback);
        for (category, phrases) in CHECK_ORDER {
            if let Some(phrase) = phrases
                .iter()
                .copied()
                .find(|p| text::contains_phrase(&padded, p))
            {
                return FeedbackClassification {
                    category: *category,
                    matched: Some(phrase),
                    reward: self.rewards.reward(*category, true),
                };
            }
        }
        FeedbackClassification {
            category: FeedbackType::Neutral,
            matched: None,
            reward: self.rewards.unmatched,
        }
    }
}
