// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feedback-driven learning for the Nyaya legal assistant.
//!
//! ## Architecture
//!
//! - **ConfidenceOffsets**: per-domain EMA offsets with a clamp bound
//! - **DomainBoosts**: classifier score boosts from explicit corrections
//! - **PatternMatcher**: Jaccard grouping of similar queries into patterns
//! - **LearningContext**: explicit per-process state over an injected store
//! - **InMemoryStore**: non-persistent store for tests and ephemeral use

pub mod context;
pub mod memory;
pub mod offsets;
pub mod patterns;

pub use context::{FeedbackInput, FeedbackOutcome, LearningContext};
pub use memory::InMemoryStore;
pub use offsets::{ConfidenceOffsets, DomainBoosts};
pub use patterns::{PatternMatch, PatternMatcher, jaccard};
