// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nyaya ask` command implementation.
//!
//! Classifies the query, prints the advice in the requested format and
//! records the query in pattern memory. A hint for rating the advice goes
//! to stderr so stdout stays machine-readable.

use nyaya_agent::formatter_for;
use nyaya_config::model::OutputFormat;
use nyaya_core::NyayaError;
use nyaya_learning::PatternMatch;

use crate::runtime::Runtime;

/// Run the `nyaya ask` command.
pub async fn run_ask(
    runtime: &Runtime,
    query: &str,
    format: Option<OutputFormat>,
) -> Result<(), NyayaError> {
    let advice = runtime.pipeline.advise(query, &runtime.learning).await?;
    let pattern = runtime
        .learning
        .observe_query(advice.domain(), &advice.query, advice.prediction.confidence)
        .await;

    let rendered = match format {
        Some(format) => formatter_for(format).format(&advice)?,
        None => runtime.pipeline.render(&advice)?,
    };
    println!("{}", rendered.trim_end());

    if format.unwrap_or(runtime.config.advice.format) != OutputFormat::Json {
        eprintln!();
        if let Some(line) = pattern_line(pattern.as_ref()) {
            eprintln!("{line}");
        }
        eprintln!("{}", rate_hint(&advice.query));
    }
    Ok(())
}

fn pattern_line(pattern: Option<&PatternMatch>) -> Option<String> {
    let found = pattern?;
    if found.created {
        Some("New question pattern recorded.".to_string())
    } else {
        Some(format!(
            "Similar questions asked {} times before.",
            found.pattern.match_count - 1
        ))
    }
}

fn rate_hint(query: &str) -> String {
    let escaped = query.replace('"', "\\\"");
    format!("Rate this advice: nyaya feedback --query \"{escaped}\" \"<your feedback>\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nyaya_core::{LegalDomain, QueryPattern};

    fn found(match_count: i64, created: bool) -> PatternMatch {
        PatternMatch {
            pattern: QueryPattern {
                id: "p1".to_string(),
                domain: LegalDomain::Employment,
                keywords: vec!["salary".to_string()],
                match_count,
                avg_confidence: 0.5,
                created_at: "2026-01-01T00:00:00Z".to_string(),
                updated_at: "2026-01-01T00:00:00Z".to_string(),
            },
            similarity: 1.0,
            created,
        }
    }

    #[test]
    fn pattern_line_reports_previous_matches() {
        assert_eq!(pattern_line(None), None);
        assert_eq!(
            pattern_line(Some(&found(1, true))).unwrap(),
            "New question pattern recorded."
        );
        assert_eq!(
            pattern_line(Some(&found(4, false))).unwrap(),
            "Similar questions asked 3 times before."
        );
    }

    #[test]
    fn rate_hint_escapes_quotes() {
        let hint = rate_hint(r#"is "advance" refundable"#);
        assert!(hint.contains(r#"--query "is \"advance\" refundable""#));
    }
}
