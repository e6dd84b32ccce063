// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the classifier, learning, storage, and agent crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Legal domains a query can be routed to.
///
/// Declaration order is significant: classifier ties resolve to the
/// earlier variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LegalDomain {
    TenantRights,
    Employment,
    FamilyLaw,
    CyberCrime,
    ConsumerProtection,
    PropertyDispute,
    CriminalLaw,
    MotorVehicle,
    RightToInformation,
    BankingFinance,
    /// Fallback when no specialised domain scores high enough.
    General,
}

impl LegalDomain {
    /// Snake-case identifier used in storage and configuration.
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Every domain except [`LegalDomain::General`], in declaration order.
    pub fn specialised() -> impl Iterator<Item = LegalDomain> {
        LegalDomain::iter().filter(|d| *d != LegalDomain::General)
    }

    /// Parse user-typed names such as `"Tenant Rights"` or `"cyber-crime"`.
    pub fn parse_loose(input: &str) -> Option<Self> {
        let key: String = input
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();
        key.parse().ok()
    }

    /// Parse from a stored string, falling back to `General` for unknown values.
    pub fn from_str_value(s: &str) -> Self {
        s.parse().unwrap_or(LegalDomain::General)
    }
}

/// Sentiment category assigned to a piece of free-text feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    Positive,
    Negative,
    /// The user asked for more detail or said the advice was unclear.
    Clarification,
    Neutral,
}

impl FeedbackType {
    /// Convert to string for SQLite storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::Positive => "positive",
            FeedbackType::Negative => "negative",
            FeedbackType::Clarification => "clarification",
            FeedbackType::Neutral => "neutral",
        }
    }

    /// Parse from SQLite string.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "positive" => FeedbackType::Positive,
            "negative" => FeedbackType::Negative,
            "clarification" => FeedbackType::Clarification,
            _ => FeedbackType::Neutral,
        }
    }
}

impl std::fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group of similarly-phrased queries within one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPattern {
    /// Generated identifier (UUID v4).
    pub id: String,
    pub domain: LegalDomain,
    /// Canonicalised keywords taken from the query that created the pattern.
    pub keywords: Vec<String>,
    /// Number of queries merged into this pattern, including the first.
    pub match_count: i64,
    /// Running average of the confidence of every merged query.
    pub avg_confidence: f64,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-update timestamp.
    pub updated_at: String,
}

/// One row of the append-only learning log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementRecord {
    pub id: String,
    pub query: String,
    pub domain: LegalDomain,
    pub confidence_before: f64,
    pub confidence_after: f64,
    pub feedback_type: FeedbackType,
    pub pattern_id: Option<String>,
    pub created_at: String,
}

/// Aggregated feedback counts for one domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainFeedbackSummary {
    pub domain: Option<LegalDomain>,
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
    pub clarification: i64,
    pub neutral: i64,
    /// Mean of `confidence_after - confidence_before`.
    pub avg_confidence_delta: f64,
}

/// A persisted multi-turn conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    /// Current state name (`idle`, `awaiting_feedback`, ...).
    pub state: String,
    pub turn_count: i64,
    pub satisfaction: f64,
    pub learning_rate: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// A single persisted turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: String,
    pub conversation_id: String,
    /// `query`, `advice`, or `feedback`.
    pub kind: String,
    pub content: String,
    pub domain: Option<LegalDomain>,
    pub confidence: Option<f64>,
    pub pattern_id: Option<String>,
    pub created_at: String,
}

/// Health status reported by store health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Store is fully operational.
    Healthy,
    /// Store is operational but experiencing issues.
    Degraded(String),
    /// Store is not operational.
    Unhealthy(String),
}

/// Current UTC time as an ISO 8601 string with millisecond precision.
pub fn timestamp_now() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_round_trips_through_strings() {
        for domain in LegalDomain::iter() {
            let s = domain.as_str();
            assert_eq!(LegalDomain::from_str_value(s), domain);
            assert_eq!(domain.to_string(), s);
        }
    }

    #[test]
    fn domain_serde_uses_snake_case() {
        let json = serde_json::to_string(&LegalDomain::TenantRights).unwrap();
        assert_eq!(json, "\"tenant_rights\"");
    }

    #[test]
    fn parse_loose_accepts_spaces_and_hyphens() {
        assert_eq!(
            LegalDomain::parse_loose("Tenant Rights"),
            Some(LegalDomain::TenantRights)
        );
        assert_eq!(
            LegalDomain::parse_loose("cyber-crime"),
            Some(LegalDomain::CyberCrime)
        );
        assert_eq!(LegalDomain::parse_loose("astrology"), None);
    }

    #[test]
    fn unknown_domain_string_falls_back_to_general() {
        assert_eq!(LegalDomain::from_str_value("maritime"), LegalDomain::General);
    }

    #[test]
    fn specialised_excludes_general() {
        let all: Vec<_> = LegalDomain::specialised().collect();
        assert_eq!(all.len(), 10);
        assert!(!all.contains(&LegalDomain::General));
        assert_eq!(all[0], LegalDomain::TenantRights);
    }

    #[test]
    fn feedback_type_variants() {
        for ft in [
            FeedbackType::Positive,
            FeedbackType::Negative,
            FeedbackType::Clarification,
            FeedbackType::Neutral,
        ] {
            assert_eq!(FeedbackType::from_str_value(ft.as_str()), ft);
        }
        assert_eq!(FeedbackType::from_str_value("garbage"), FeedbackType::Neutral);
    }

    #[test]
    fn timestamp_has_millisecond_precision() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000Z".len());
    }
}
