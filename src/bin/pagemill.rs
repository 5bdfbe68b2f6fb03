//! CLI binary for pagemill.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints results.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagemill::{extract_figures, extract_text, ExtractionConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pagemill",
    version,
    about = "Extract captioned figures and reflowed text from PDF documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory receiving rendered pages and figure crops
    #[arg(long, global = true, default_value = "output")]
    output_dir: PathBuf,

    /// Rendering DPI (72-600)
    #[arg(long, global = true, default_value_t = 300)]
    dpi: u32,

    /// Print the full run result as JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Detect figure regions on every page, crop them, and caption each crop
    Figures {
        /// Path to the PDF document
        input: String,
    },
    /// Recognize text lines, drop noise, and reflow into readable text
    Text {
        /// Path to the PDF document
        input: String,

        /// Chat model used by the reflow service
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ExtractionConfig::from_env();
    config.output_dir = cli.output_dir;
    config.dpi = cli.dpi.clamp(72, 600);

    match cli.command {
        Command::Figures { input } => {
            let run = extract_figures(&input, &config)
                .await
                .context("figure extraction failed")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                for figure in &run.figures {
                    println!("{}: {}", figure.path.display(), figure.caption);
                }
                eprintln!(
                    "{} figure(s) across {} page(s) in {}ms",
                    run.figures.len(),
                    run.stats.page_count,
                    run.stats.total_duration_ms
                );
            }
        }
        Command::Text { input, model } => {
            if let Some(model) = model {
                config.reflow_model = model;
            }
            let run = extract_text(&input, &config)
                .await
                .context("text extraction failed")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                for page in &run.pages {
                    println!("{}", page.text);
                }
                eprintln!(
                    "{} page(s) in {}ms",
                    run.stats.page_count, run.stats.total_duration_ms
                );
            }
        }
    }

    Ok(())
}
