// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Advice templates filled from a knowledge-base entry.

use nyaya_config::model::PenalCode;
use nyaya_core::LegalDomain;
use nyaya_knowledge::{ArticleRef, DomainKnowledge, GlossaryTerm, PenalSection};
use serde::Serialize;

use crate::strategy::AdviceStrategy;

/// A penal provision cited in the numbering chosen by the strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenalReference {
    /// e.g. `BNS 318(4)` or `BNS 318(4) / IPC 420`.
    pub citation: String,
    pub title: String,
}

/// The advice content for one domain, trimmed to the strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceBundle {
    pub domain: LegalDomain,
    pub title: String,
    pub legal_route: String,
    pub timeline: String,
    pub process_steps: Vec<String>,
    pub glossary: Vec<GlossaryTerm>,
    pub constitutional_articles: Vec<ArticleRef>,
    pub penal_sections: Vec<PenalReference>,
}

impl AdviceBundle {
    /// Fill the advice template of `entry` under `strategy`.
    pub fn assemble(entry: &DomainKnowledge, strategy: &AdviceStrategy) -> Self {
        let glossary = if strategy.include_glossary {
            entry.glossary.clone()
        } else {
            Vec::new()
        };
        let constitutional_articles = if strategy.include_constitution {
            entry.constitutional_articles.clone()
        } else {
            Vec::new()
        };

        Self {
            domain: entry.domain,
            title: entry.title.clone(),
            legal_route: entry.legal_route.clone(),
            timeline: entry.timeline.clone(),
            process_steps: entry
                .process_steps
                .iter()
                .take(strategy.max_process_steps)
                .cloned()
                .collect(),
            glossary,
            constitutional_articles,
            penal_sections: entry
                .penal_sections
                .iter()
                .filter_map(|section| cite(section, strategy.penal_code))
                .collect(),
        }
    }
}

/// Cite `section` in `code` numbering.
///
/// Sections without a number in a single requested code are skipped; `Both`
/// cites whichever numbers exist.
pub fn cite(section: &PenalSection, code: PenalCode) -> Option<PenalReference> {
    let bns = section.bns.as_deref().map(|n| format!("BNS {n}"));
    let ipc = section.ipc.as_deref().map(|n| format!("IPC {n}"));
    let citation = match code {
        PenalCode::Bns => bns?,
        PenalCode::Ipc => ipc?,
        PenalCode::Both => match (bns, ipc) {
            (Some(b), Some(i)) => format!("{b} / {i}"),
            (Some(b), None) => b,
            (None, Some(i)) => i,
            (None, None) => return None,
        },
    };
    Some(PenalReference {
        citation,
        title: section.title.clone(),
    })
}
