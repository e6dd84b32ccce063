// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query and feedback classification for the Nyaya legal assistant.
//!
//! This crate provides:
//! - [`text`]: normalisation, stopwords, canonical legal concepts, keyword extraction
//! - [`DomainClassifier`]: TF-IDF plus keyword scoring over legal domains
//! - [`FeedbackClassifier`]: phrase-based feedback sentiment with a reward table

pub mod domain;
pub mod feedback;
pub mod text;
pub mod tfidf;

pub use domain::{DomainClassifier, DomainPrediction, DomainProfile, DomainScore};
pub use feedback::{FeedbackClassification, FeedbackClassifier, RewardTable};
pub use text::{extract_keywords, normalize};
