// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading and validating the knowledge base.

use std::collections::HashSet;
use std::path::Path;

use nyaya_core::{LegalDomain, NyayaError};
use serde::Deserialize;
use tracing::debug;

use crate::model::DomainKnowledge;

const EMBEDDED: &str = include_str!("../data/knowledge.toml");

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct KnowledgeFile {
    domains: Vec<DomainKnowledge>,
}

/// Validated collection of domain entries with a guaranteed `general` entry.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    domains: Vec<DomainKnowledge>,
    general: usize,
}

impl KnowledgeBase {
    /// The knowledge base compiled into the binary.
    pub fn embedded() -> Result<Self, NyayaError> {
        Self::from_toml_str(EMBEDDED)
    }

    /// Load a replacement knowledge base from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, NyayaError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NyayaError::Knowledge(format!("cannot read {}: {e}", path.display()))
        })?;
        let kb = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), domains = kb.domains.len(), "knowledge base loaded");
        Ok(kb)
    }

    /// Parse and validate knowledge from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, NyayaError> {
        let file: KnowledgeFile =
            toml::from_str(content).map_err(|e| NyayaError::Knowledge(e.to_string()))?;
        Self::new(file.domains)
    }

    /// Validate entries: no duplicate domains and a `general` entry present.
    pub fn new(domains: Vec<DomainKnowledge>) -> Result<Self, NyayaError> {
        let mut seen = HashSet::new();
        for entry in &domains {
            if !seen.insert(entry.domain) {
                return Err(NyayaError::Knowledge(format!(
                    "duplicate entry for domain `{}`",
                    entry.domain
                )));
            }
        }
        let general = domains
            .iter()
            .position(|d| d.domain == LegalDomain::General)
            .ok_or_else(|| NyayaError::Knowledge("missing `general` entry".to_string()))?;
        Ok(Self { domains, general })
    }

    /// Entries in file order.
    pub fn domains(&self) -> &[DomainKnowledge] {
        &self.domains
    }

    pub fn get(&self, domain: LegalDomain) -> Option<&DomainKnowledge> {
        self.domains.iter().find(|d| d.domain == domain)
    }

    /// Entry for `domain`, or the `general` entry when it has none.
    pub fn entry(&self, domain: LegalDomain) -> &DomainKnowledge {
        self.get(domain).unwrap_or(&self.domains[self.general])
    }

    pub fn general(&self) -> &DomainKnowledge {
        &self.domains[self.general]
    }
}
