//! Lexfile CLI: run the document pipeline's extraction and analysis steps
//! against a local file, without the chat framework.
//!
//! Set OPENAI_API_KEY (or a .env file) for the `analyze` command.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use lexfile_analysis::{build_analysis_prompt, AnalysisClient};
use lexfile_cli::init_tracing;
use lexfile_core::Config;
use lexfile_extract::ExtractionStatus;

#[derive(Parser)]
#[command(name = "lexfile", about = "Lexfile document intelligence CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract plain text from a document and print it
    Extract {
        /// Path to the document
        file: PathBuf,
    },
    /// Extract, then run the full analysis against the configured service
    Analyze {
        /// Path to the document
        file: PathBuf,
    },
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { file } => {
            let extracted = lexfile_extract::extract(&file, &extension_of(&file));
            match extracted.status {
                ExtractionStatus::Ok => println!("{}", extracted.text),
                ExtractionStatus::Empty | ExtractionStatus::Error => {
                    println!("{}", extracted.note().unwrap_or("No text extracted"));
                }
            }
            if extracted.status == ExtractionStatus::Error {
                std::process::exit(1);
            }
        }
        Commands::Analyze { file } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            let client = AnalysisClient::from_config(config.analysis)
                .context("Failed to build analysis client")?;

            let extracted = lexfile_extract::extract(&file, &extension_of(&file));
            if !extracted.is_analyzable() {
                anyhow::bail!(
                    "{}",
                    extracted.note().unwrap_or("Text extraction failed")
                );
            }

            let prompt = build_analysis_prompt(&extracted.text, &extracted.filename);
            let outcome = client.analyze(&prompt).await;
            println!("{}", outcome.presentable_text());
        }
    }

    Ok(())
}
