// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knobs that shape one advice pipeline.

use nyaya_config::model::{AdviceConfig, PenalCode};
use serde::Serialize;

/// How advice bundles are assembled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceStrategy {
    /// Which penal code numbering to cite.
    pub penal_code: PenalCode,
    pub include_glossary: bool,
    pub include_constitution: bool,
    /// Process steps beyond this count are dropped.
    pub max_process_steps: usize,
    /// Adjusted confidence below this asks the user to clarify.
    pub clarification_threshold: f64,
}

impl AdviceStrategy {
    pub fn from_config(config: &AdviceConfig) -> Self {
        Self {
            penal_code: config.penal_code,
            include_glossary: config.include_glossary,
            include_constitution: config.include_constitution,
            max_process_steps: config.max_process_steps,
            clarification_threshold: config.clarification_threshold,
        }
    }
}

impl Default for AdviceStrategy {
    fn default() -> Self {
        Self::from_config(&AdviceConfig::default())
    }
}
