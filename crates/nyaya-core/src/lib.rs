// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Nyaya legal assistant.
//!
//! Provides the shared error type, domain types, and the store traits that
//! the learning context and conversation sessions depend on.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::NyayaError;
pub use types::{
    Conversation, DomainFeedbackSummary, FeedbackType, HealthStatus, ImprovementRecord,
    LegalDomain, QueryPattern, Turn, timestamp_now,
};

pub use traits::{ConversationStore, LearningStore, StoreAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_traits_are_exported() {
        fn _assert_store_adapter<T: StoreAdapter>() {}
        fn _assert_learning_store<T: LearningStore>() {}
        fn _assert_conversation_store<T: ConversationStore>() {}
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        assert_ne!(HealthStatus::Degraded("slow".into()), healthy);
        assert_ne!(HealthStatus::Unhealthy("down".into()), healthy);
    }

    #[test]
    fn traits_are_object_safe() {
        fn _learning(_: &dyn LearningStore) {}
        fn _conversation(_: &dyn ConversationStore) {}
    }
}
