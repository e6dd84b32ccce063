// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nyaya - a legal-advice assistant for Indian law.
//!
//! This is the binary entry point. Every subcommand is one-shot: it loads
//! configuration, opens the SQLite store, does its work and exits.

mod ask;
mod feedback;
mod report;
mod runtime;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use nyaya_config::NyayaConfig;
use nyaya_config::model::OutputFormat;
use nyaya_core::{LegalDomain, NyayaError};

use crate::runtime::Runtime;

/// Nyaya - legal guidance for Indian law that learns from feedback.
#[derive(Parser, Debug)]
#[command(name = "nyaya", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Get advice for a legal question.
    Ask {
        /// The question, quoted or as separate words.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Output format (defaults to `advice.format`).
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Rate the advice given for a question.
    Feedback {
        /// The question the advice answered.
        #[arg(long)]
        query: String,
        /// Free-text feedback, e.g. "very helpful" or "this is wrong".
        text: String,
        /// The legal domain the question actually belongs to.
        #[arg(long, value_parser = parse_domain)]
        domain: Option<LegalDomain>,
        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List recorded question patterns.
    Patterns {
        #[arg(long, value_parser = parse_domain)]
        domain: Option<LegalDomain>,
        #[arg(long)]
        json: bool,
    },
    /// Show feedback counts and learned confidence offsets.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Plain,
    Markdown,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Plain => OutputFormat::Plain,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn parse_domain(input: &str) -> Result<LegalDomain, String> {
    LegalDomain::parse_loose(input).ok_or_else(|| {
        let valid: Vec<&str> = LegalDomain::specialised().map(|d| d.as_str()).collect();
        format!("unknown legal domain `{input}`; expected one of {}", valid.join(", "))
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => nyaya_config::load_and_validate_path(path),
        None => nyaya_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            nyaya_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli, config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: NyayaConfig) -> Result<(), NyayaError> {
    if let Commands::Config = cli.command {
        let rendered = toml::to_string_pretty(&config)
            .map_err(|e| NyayaError::Config(format!("failed to render config: {e}")))?;
        print!("{rendered}");
        return Ok(());
    }

    let runtime = Runtime::open(config).await?;
    let result = match cli.command {
        Commands::Ask { query, format } => {
            ask::run_ask(&runtime, &query.join(" "), format.map(OutputFormat::from)).await
        }
        Commands::Feedback {
            query,
            text,
            domain,
            json,
        } => feedback::run_feedback(&runtime, &query, &text, domain, json).await,
        Commands::Patterns { domain, json } => {
            report::run_patterns(&runtime, domain, json, cli.plain).await
        }
        Commands::Stats { json } => report::run_stats(&runtime, json, cli.plain).await,
        Commands::Config => Ok(()),
    };
    runtime.shutdown().await;
    result
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output on stdout stays parseable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nyaya={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
