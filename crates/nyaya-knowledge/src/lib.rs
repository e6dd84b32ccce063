// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static legal knowledge for the Nyaya legal assistant.
//!
//! A compact TOML data file is compiled in; deployments can point
//! `knowledge.path` at a replacement file with the same layout.

pub mod loader;
pub mod model;

pub use loader::KnowledgeBase;
pub use model::{ArticleRef, DomainKnowledge, GlossaryTerm, PenalSection};
