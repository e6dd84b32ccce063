// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of assembled advice.

use std::fmt::Write;

use nyaya_config::model::OutputFormat;
use nyaya_core::NyayaError;

use crate::pipeline::Advice;

/// Shown when the adjusted confidence is below the clarification threshold.
pub const CLARIFICATION_PROMPT: &str = "I am not sure which area of law this falls under. \
     Could you add details such as who is involved, what happened and when?";

/// Turns [`Advice`] into text for one output channel.
pub trait AdviceFormatter: Send + Sync {
    fn name(&self) -> &'static str;

    fn format(&self, advice: &Advice) -> Result<String, NyayaError>;
}

/// Formatter for a configured output format.
pub fn formatter_for(format: OutputFormat) -> Box<dyn AdviceFormatter> {
    match format {
        OutputFormat::Plain => Box::new(PlainFormatter),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
        OutputFormat::Json => Box::new(JsonFormatter { pretty: true }),
    }
}

fn percent(confidence: f64) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Terminal-friendly text with indented sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl AdviceFormatter for PlainFormatter {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn format(&self, advice: &Advice) -> Result<String, NyayaError> {
        let bundle = &advice.bundle;
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{} (confidence {}%)",
            bundle.title,
            percent(advice.confidence)
        );
        if advice.needs_clarification {
            let _ = writeln!(out, "\n{CLARIFICATION_PROMPT}");
        }
        let _ = writeln!(out, "\nLegal route:\n  {}", bundle.legal_route);
        let _ = writeln!(out, "\nTimeline:\n  {}", bundle.timeline);
        if !bundle.process_steps.is_empty() {
            let _ = writeln!(out, "\nSteps:");
            for (i, step) in bundle.process_steps.iter().enumerate() {
                let _ = writeln!(out, "  {}. {step}", i + 1);
            }
        }
        if !bundle.penal_sections.is_empty() {
            let _ = writeln!(out, "\nPenal provisions:");
            for section in &bundle.penal_sections {
                let _ = writeln!(out, "  - {}: {}", section.citation, section.title);
            }
        }
        if !bundle.constitutional_articles.is_empty() {
            let _ = writeln!(out, "\nConstitutional articles:");
            for article in &bundle.constitutional_articles {
                let _ = writeln!(out, "  - Article {}: {}", article.article, article.title);
            }
        }
        if !bundle.glossary.is_empty() {
            let _ = writeln!(out, "\nGlossary:");
            for term in &bundle.glossary {
                let _ = writeln!(out, "  - {}: {}", term.term, term.definition);
            }
        }
        Ok(out)
    }
}

/// Markdown with one heading per section.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormatter;

impl AdviceFormatter for MarkdownFormatter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn format(&self, advice: &Advice) -> Result<String, NyayaError> {
        let bundle = &advice.bundle;
        let mut out = String::new();
        let _ = writeln!(out, "## {}\n", bundle.title);
        let _ = writeln!(
            out,
            "*Domain:* `{}` | *Confidence:* {}%",
            bundle.domain,
            percent(advice.confidence)
        );
        if advice.needs_clarification {
            let _ = writeln!(out, "\n> {CLARIFICATION_PROMPT}");
        }
        let _ = writeln!(out, "\n### Legal route\n\n{}", bundle.legal_route);
        let _ = writeln!(out, "\n### Timeline\n\n{}", bundle.timeline);
        if !bundle.process_steps.is_empty() {
            let _ = writeln!(out, "\n### Steps\n");
            for (i, step) in bundle.process_steps.iter().enumerate() {
                let _ = writeln!(out, "{}. {step}", i + 1);
            }
        }
        if !bundle.penal_sections.is_empty() {
            let _ = writeln!(out, "\n### Penal provisions\n");
            for section in &bundle.penal_sections {
                let _ = writeln!(out, "- **{}**: {}", section.citation, section.title);
            }
        }
        if !bundle.constitutional_articles.is_empty() {
            let _ = writeln!(out, "\n### Constitutional articles\n");
            for article in &bundle.constitutional_articles {
                let _ = writeln!(out, "- **Article {}**: {}", article.article, article.title);
            }
        }
        if !bundle.glossary.is_empty() {
            let _ = writeln!(out, "\n### Glossary\n");
            for term in &bundle.glossary {
                let _ = writeln!(out, "- **{}**: {}", term.term, term.definition);
            }
        }
        Ok(out)
    }
}

/// The whole [`Advice`] as JSON.
#[derive(Debug, Clone, Copy)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl AdviceFormatter for JsonFormatter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn format(&self, advice: &Advice) -> Result<String, NyayaError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(advice)
        } else {
            serde_json::to_string(advice)
        };
        rendered.map_err(|e| NyayaError::Internal(format!("failed to serialize advice: {e}")))
    }
}
