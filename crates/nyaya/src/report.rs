// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nyaya patterns` and `nyaya stats` command implementations.
//!
//! Both read what earlier runs learned. `--json` prints structured output
//! for scripting; colors are used only on a terminal and without `--plain`.

use std::io::IsTerminal;

use nyaya_core::{DomainFeedbackSummary, LearningStore, LegalDomain, NyayaError, QueryPattern};
use serde::Serialize;

use crate::runtime::Runtime;

/// Structured output of `nyaya stats --json`.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub patterns: usize,
    pub feedback: Vec<DomainFeedbackSummary>,
    pub offsets: Vec<OffsetEntry>,
}

#[derive(Debug, Serialize)]
pub struct OffsetEntry {
    pub domain: LegalDomain,
    pub offset: f64,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, NyayaError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| NyayaError::Internal(format!("failed to serialize report: {e}")))
}

fn use_color(plain: bool) -> bool {
    !plain && std::io::stdout().is_terminal()
}

/// Run the `nyaya patterns` command.
pub async fn run_patterns(
    runtime: &Runtime,
    domain: Option<LegalDomain>,
    json: bool,
    plain: bool,
) -> Result<(), NyayaError> {
    let patterns = runtime.store.list_patterns(domain).await?;
    if json {
        println!("{}", to_json(&patterns)?);
        return Ok(());
    }
    print!("{}", render_patterns(&patterns, use_color(plain)));
    Ok(())
}

/// Run the `nyaya stats` command.
pub async fn run_stats(runtime: &Runtime, json: bool, plain: bool) -> Result<(), NyayaError> {
    let report = StatsReport {
        patterns: runtime.store.list_patterns(None).await?.len(),
        feedback: runtime.store.feedback_summary().await?,
        offsets: runtime
            .store
            .load_offsets()
            .await?
            .into_iter()
            .map(|(domain, offset)| OffsetEntry { domain, offset })
            .collect(),
    };
    if json {
        println!("{}", to_json(&report)?);
        return Ok(());
    }
    print!("{}", render_stats(&report, use_color(plain)));
    Ok(())
}

fn render_patterns(patterns: &[QueryPattern], color: bool) -> String {
    if patterns.is_empty() {
        return "  No question patterns recorded yet.\n".to_string();
    }
    let mut out = String::new();
    out.push_str(&format!(
        "  {:<22} {:>7} {:>8}  keywords\n",
        "domain", "matches", "avg conf"
    ));
    out.push_str(&format!("  {}\n", "-".repeat(60)));
    for pattern in patterns {
        let domain = format!("{:<22}", pattern.domain.as_str());
        let domain = if color {
            use colored::Colorize;
            domain.cyan().to_string()
        } else {
            domain
        };
        out.push_str(&format!(
            "  {domain} {:>7} {:>7.0}%  {}\n",
            pattern.match_count,
            pattern.avg_confidence * 100.0,
            pattern.keywords.join(", ")
        ));
    }
    out
}

fn render_stats(report: &StatsReport, color: bool) -> String {
    let mut out = String::new();
    out.push_str("\n  nyaya stats\n");
    out.push_str(&format!("  {}\n", "-".repeat(35)));
    out.push_str(&format!("    Patterns:  {}\n", report.patterns));

    let overall = report.feedback.iter().find(|s| s.domain.is_none());
    match overall {
        Some(total) if total.total > 0 => {
            let positive = format!("{} positive", total.positive);
            let negative = format!("{} negative", total.negative);
            let (positive, negative) = if color {
                use colored::Colorize;
                (positive.green().to_string(), negative.red().to_string())
            } else {
                (positive, negative)
            };
            out.push_str(&format!(
                "    Feedback:  {} ({positive}, {negative}, {} clarification, {} neutral)\n",
                total.total, total.clarification, total.neutral
            ));
        }
        _ => out.push_str("    Feedback:  none yet\n"),
    }

    let by_domain: Vec<&DomainFeedbackSummary> = report
        .feedback
        .iter()
        .filter(|s| s.domain.is_some())
        .collect();
    if !by_domain.is_empty() {
        out.push_str("\n  By domain:\n");
        for summary in by_domain {
            if let Some(domain) = summary.domain {
                out.push_str(&format!(
                    "    {:<22} {:>3} ratings, avg confidence change {:+.3}\n",
                    domain.as_str(),
                    summary.total,
                    summary.avg_confidence_delta
                ));
            }
        }
    }

    if !report.offsets.is_empty() {
        out.push_str("\n  Confidence offsets:\n");
        for entry in &report.offsets {
            out.push_str(&format!(
                "    {:<22} {:+.3}\n",
                entry.domain.as_str(),
                entry.offset
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(domain: LegalDomain, keywords: &[&str], match_count: i64) -> QueryPattern {
        QueryPattern {
            id: format!("{domain}-{match_count}"),
            domain,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            match_count,
            avg_confidence: 0.75,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn empty_patterns_message() {
        assert!(render_patterns(&[], false).contains("No question patterns"));
    }

    #[test]
    fn patterns_table_lists_rows() {
        let text = render_patterns(
            &[
                pattern(LegalDomain::TenantRights, &["landlord", "deposit"], 3),
                pattern(LegalDomain::Employment, &["salary"], 1),
            ],
            false,
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("tenant_rights"));
        assert!(lines[2].contains("landlord, deposit"));
        assert!(lines[2].contains("75%"));
        assert!(lines[3].contains("employment"));
    }

    #[test]
    fn stats_without_feedback() {
        let report = StatsReport {
            patterns: 0,
            feedback: vec![DomainFeedbackSummary::default()],
            offsets: Vec::new(),
        };
        let text = render_stats(&report, false);
        assert!(text.contains("Patterns:  0"));
        assert!(text.contains("Feedback:  none yet"));
        assert!(!text.contains("Confidence offsets"));
    }

    #[test]
    fn stats_with_feedback_and_offsets() {
        let report = StatsReport {
            patterns: 2,
            feedback: vec![
                DomainFeedbackSummary {
                    domain: Some(LegalDomain::TenantRights),
                    total: 3,
                    positive: 2,
                    negative: 1,
                    avg_confidence_delta: 0.05,
                    ..DomainFeedbackSummary::default()
                },
                DomainFeedbackSummary {
                    domain: None,
                    total: 3,
                    positive: 2,
                    negative: 1,
                    avg_confidence_delta: 0.05,
                    ..DomainFeedbackSummary::default()
                },
            ],
            offsets: vec![OffsetEntry {
                domain: LegalDomain::TenantRights,
                offset: 0.125,
            }],
        };
        let text = render_stats(&report, false);
        assert!(text.contains("Feedback:  3 (2 positive, 1 negative, 0 clarification, 0 neutral)"));
        assert!(text.contains("tenant_rights"));
        assert!(text.contains("+0.050"));
        assert!(text.contains("+0.125"));
    }
}
