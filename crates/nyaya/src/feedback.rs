// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nyaya feedback` command implementation.

use nyaya_core::{LegalDomain, NyayaError};
use nyaya_learning::{FeedbackInput, FeedbackOutcome};
use serde::Serialize;

use crate::runtime::Runtime;

#[derive(Debug, Serialize)]
struct FeedbackReport<'a> {
    domain: LegalDomain,
    pattern_id: Option<&'a str>,
    #[serde(flatten)]
    outcome: &'a FeedbackOutcome,
}

/// Run the `nyaya feedback` command.
///
/// The query is classified again to find the domain the advice was given
/// for, and linked to its pattern without counting another match.
pub async fn run_feedback(
    runtime: &Runtime,
    query: &str,
    text: &str,
    correct_domain: Option<LegalDomain>,
    json: bool,
) -> Result<(), NyayaError> {
    let advice = runtime.pipeline.advise(query, &runtime.learning).await?;
    let domain = advice.domain();
    let pattern = runtime.learning.find_pattern(domain, &advice.query).await;
    let pattern_id = pattern.map(|p| p.id);

    let outcome = runtime
        .learning
        .apply_feedback(FeedbackInput {
            query: advice.query.clone(),
            domain,
            base_confidence: advice.prediction.confidence,
            feedback: text.to_string(),
            learning_rate: runtime.config.learning.initial_learning_rate,
            pattern_id: pattern_id.clone(),
            correct_domain,
        })
        .await;

    if json {
        let report = FeedbackReport {
            domain,
            pattern_id: pattern_id.as_deref(),
            outcome: &outcome,
        };
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| NyayaError::Internal(format!("failed to serialize feedback: {e}")))?;
        println!("{rendered}");
    } else {
        let persisted = runtime.config.learning.persist_offsets;
        println!("{}", summary(domain, &outcome, persisted));
    }
    Ok(())
}

fn summary(domain: LegalDomain, outcome: &FeedbackOutcome, persisted: bool) -> String {
    let mut line = format!(
        "Recorded {} feedback for {domain}: confidence {:.0}% -> {:.0}% (offset {:+.3})",
        outcome.classification.category,
        outcome.confidence_before * 100.0,
        outcome.confidence_after * 100.0,
        outcome.offset,
    );
    if let Some(correct) = outcome.corrected_to {
        if persisted {
            line.push_str(&format!(". Future queries like this lean towards {correct}"));
        } else {
            line.push_str(&format!(
                ". Correction to {correct} is not kept; set learning.persist_offsets to keep it"
            ));
        }
    }
    line
}
