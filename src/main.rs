use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use cinder::config::Config;
use cinder::output::terminal;
use cinder::pipeline::batch;
use cinder::toxicity::analyzer::ToxicityAnalyzer;

/// Cinder: toxicity scoring for user-submitted posts.
///
/// Probes the configured remote model on every analysis and falls back to
/// a local rule engine whenever the remote is unavailable.
#[derive(Parser)]
#[command(name = "cinder", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single text
    Analyze {
        /// The text to analyze
        text: String,

        /// Print the result as JSON instead of a formatted report
        #[arg(long)]
        json: bool,
    },

    /// Probe the configured remote backend
    Health,

    /// Analyze every line of a file
    Batch {
        /// File with one text per line
        file: PathBuf,

        /// Number of analyses in flight (default: 4)
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cinder=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let analyzer = ToxicityAnalyzer::from_config(&config)?;

    info!(
        backend = config.preferred_backend.as_str(),
        remote = config.remote_url().unwrap_or("none"),
        "Analyzer ready"
    );

    match cli.command {
        Commands::Analyze { text, json } => {
            let outcome = analyzer.analyze_detailed(&text).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.result)?);
            } else {
                terminal::display_outcome(&text, &outcome);
            }
        }

        Commands::Health => {
            let health = analyzer.health().await;
            terminal::display_health(
                config.preferred_backend.as_str(),
                config.remote_url(),
                health.as_ref(),
            );
        }

        Commands::Batch {
            file,
            concurrency,
            json,
        } => {
            let texts = batch::read_texts(&file)?;
            if texts.is_empty() {
                println!("No texts found in {}", file.display());
                return Ok(());
            }
            if !json {
                println!("Analyzing {} texts ({} concurrent)...", texts.len(), concurrency);
            }

            let report = batch::analyze_batch(&analyzer, &texts, concurrency, !json).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_batch_report(&report);
            }
        }
    }

    Ok(())
}
