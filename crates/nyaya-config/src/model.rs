// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Nyaya legal assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so that a misspelled key
//! is reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Nyaya configuration.
///
/// Every section is optional and falls back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NyayaConfig {
    /// Assistant identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Domain classifier weighting.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Confidence adaptation settings.
    #[serde(default)]
    pub learning: LearningConfig,

    /// Reward table for classified feedback.
    #[serde(default)]
    pub feedback: FeedbackConfig,

    /// Query-pattern grouping.
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Multi-turn conversation limits.
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Advice assembly strategy.
    #[serde(default)]
    pub advice: AdviceConfig,

    /// Knowledge base location.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

/// Assistant identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "nyaya".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("nyaya").join("nyaya.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("nyaya.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Weights for the hybrid TF-IDF + keyword domain classifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Weight of the best TF-IDF cosine similarity against a domain's examples.
    #[serde(default = "default_tfidf_weight")]
    pub tfidf_weight: f64,

    /// Weight of the keyword-hit score.
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,

    /// Best scores below this route the query to the `general` domain.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            tfidf_weight: default_tfidf_weight(),
            keyword_weight: default_keyword_weight(),
            min_score: default_min_score(),
        }
    }
}

fn default_tfidf_weight() -> f64 {
    0.7
}

fn default_keyword_weight() -> f64 {
    0.3
}

fn default_min_score() -> f64 {
    0.12
}

/// Exponential-moving-average confidence adaptation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LearningConfig {
    /// EMA weight of the newest adjustment: `offset = (1-a)*offset + a*adjustment`.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Offsets and boosts are clamped to `[-max_offset, +max_offset]`.
    #[serde(default = "default_max_offset")]
    pub max_offset: f64,

    /// Boost applied when feedback names the domain the query belonged to.
    #[serde(default = "default_correction_boost")]
    pub correction_boost: f64,

    /// Load and save offsets through the store instead of keeping them per process.
    #[serde(default)]
    pub persist_offsets: bool,

    /// Learning rate of a fresh conversation.
    #[serde(default = "default_initial_learning_rate")]
    pub initial_learning_rate: f64,

    /// Multiplier applied to a conversation's learning rate after each feedback.
    #[serde(default = "default_learning_rate_decay")]
    pub learning_rate_decay: f64,

    /// Floor for the decayed learning rate.
    #[serde(default = "default_min_learning_rate")]
    pub min_learning_rate: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            max_offset: default_max_offset(),
            correction_boost: default_correction_boost(),
            persist_offsets: false,
            initial_learning_rate: default_initial_learning_rate(),
            learning_rate_decay: default_learning_rate_decay(),
            min_learning_rate: default_min_learning_rate(),
        }
    }
}

fn default_alpha() -> f64 {
    0.95
}

fn default_max_offset() -> f64 {
    0.3
}

fn default_correction_boost() -> f64 {
    0.05
}

fn default_initial_learning_rate() -> f64 {
    1.0
}

fn default_learning_rate_decay() -> f64 {
    0.9
}

fn default_min_learning_rate() -> f64 {
    0.3
}

/// Base reward per feedback category.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackConfig {
    #[serde(default = "default_reward_positive")]
    pub positive: f64,

    #[serde(default = "default_reward_negative")]
    pub negative: f64,

    #[serde(default = "default_reward_clarification")]
    pub clarification: f64,

    #[serde(default = "default_reward_neutral")]
    pub neutral: f64,

    /// Reward when no phrase of any category matched.
    #[serde(default)]
    pub unmatched: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            positive: default_reward_positive(),
            negative: default_reward_negative(),
            clarification: default_reward_clarification(),
            neutral: default_reward_neutral(),
            unmatched: 0.0,
        }
    }
}

fn default_reward_positive() -> f64 {
    0.1
}

fn default_reward_negative() -> f64 {
    -0.15
}

fn default_reward_clarification() -> f64 {
    -0.05
}

fn default_reward_neutral() -> f64 {
    0.02
}

/// Query-pattern grouping configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PatternConfig {
    /// Minimum keyword-set Jaccard similarity for merging into an existing pattern.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Maximum number of keywords kept per pattern.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_keywords: default_max_keywords(),
        }
    }
}

fn default_similarity_threshold() -> f64 {
    0.5
}

fn default_max_keywords() -> usize {
    8
}

/// Conversation state machine limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationConfig {
    /// The conversation closes once this many turns have been recorded.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Consecutive negative feedbacks that escalate to a human lawyer referral.
    #[serde(default = "default_escalation_negatives")]
    pub escalation_negatives: usize,

    /// Satisfaction below this escalates on the next negative feedback.
    #[serde(default = "default_escalation_satisfaction")]
    pub escalation_satisfaction: f64,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            escalation_negatives: default_escalation_negatives(),
            escalation_satisfaction: default_escalation_satisfaction(),
        }
    }
}

fn default_max_turns() -> usize {
    20
}

fn default_escalation_negatives() -> usize {
    2
}

fn default_escalation_satisfaction() -> f64 {
    0.2
}

/// Penal-code numbering used when listing offence sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PenalCode {
    /// Bharatiya Nyaya Sanhita, 2023.
    #[default]
    Bns,
    /// Indian Penal Code, 1860.
    Ipc,
    /// Both numberings side by side.
    Both,
}

/// Rendering of assembled advice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Plain,
    #[default]
    Markdown,
    Json,
}

/// Advice assembly configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdviceConfig {
    #[serde(default)]
    pub penal_code: PenalCode,

    #[serde(default = "default_true")]
    pub include_glossary: bool,

    #[serde(default = "default_true")]
    pub include_constitution: bool,

    /// Process steps beyond this count are dropped.
    #[serde(default = "default_max_process_steps")]
    pub max_process_steps: usize,

    /// Adjusted confidence below this asks the user to clarify.
    #[serde(default = "default_clarification_threshold")]
    pub clarification_threshold: f64,

    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            penal_code: PenalCode::default(),
            include_glossary: true,
            include_constitution: true,
            max_process_steps: default_max_process_steps(),
            clarification_threshold: default_clarification_threshold(),
            format: OutputFormat::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_process_steps() -> usize {
    8
}

fn default_clarification_threshold() -> f64 {
    0.3
}

/// Knowledge base location.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// Path to a replacement knowledge-base TOML. `None` uses the bundled data.
    #[serde(default)]
    pub path: Option<String>,
}
