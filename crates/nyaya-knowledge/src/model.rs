// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge base entry types.

use nyaya_core::LegalDomain;
use serde::{Deserialize, Serialize};

/// A legal term and its plain-language meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: String,
}

/// A reference to an article of the Constitution of India.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArticleRef {
    pub article: String,
    pub title: String,
}

/// A penal provision under BNS and, where one exists, its IPC predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PenalSection {
    #[serde(default)]
    pub bns: Option<String>,
    #[serde(default)]
    pub ipc: Option<String>,
    pub title: String,
}

/// Everything the assistant knows about one legal domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainKnowledge {
    pub domain: LegalDomain,
    pub title: String,
    /// Phrases that signal the domain in a query.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Example queries the classifier trains on.
    #[serde(default)]
    pub examples: Vec<String>,
    pub legal_route: String,
    pub timeline: String,
    #[serde(default)]
    pub process_steps: Vec<String>,
    #[serde(default)]
    pub glossary: Vec<GlossaryTerm>,
    #[serde(default)]
    pub constitutional_articles: Vec<ArticleRef>,
    #[serde(default)]
    pub penal_sections: Vec<PenalSection>,
}
