#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the blotter incident analysis toolchain.
//!
//! Runs one analysis batch to completion: fetch the input documents,
//! extract incident records, aggregate them into a table, cluster the
//! incident descriptions, and export the augmented table for whatever
//! rendering layer sits on top.

mod export;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blotter", about = "Police incident-summary analysis tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract incidents from the input documents, cluster the incident
    /// natures, and export the augmented table
    Analyze {
        /// Local incident-summary PDF files
        files: Vec<PathBuf>,
        /// URL of an incident-summary PDF (repeatable)
        #[arg(long)]
        url: Vec<String>,
        /// Number of clusters (1-10), or 0 to infer the count from the
        /// distance threshold
        #[arg(long, default_value = "0")]
        clusters: usize,
        /// Encoder backend: `hash` or `remote` (defaults to the
        /// `BLOTTER_ENCODER` env var, then `hash`)
        #[arg(long)]
        encoder: Option<String>,
        /// Rows per embedding batch
        #[arg(long, default_value = "64")]
        batch_size: usize,
        /// Per-document fetch timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
        /// Output format: `json` or `csv`
        #[arg(long, default_value = "json")]
        format: String,
        /// Output path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Extract incidents only and export the raw table
    Extract {
        /// Local incident-summary PDF files
        files: Vec<PathBuf>,
        /// URL of an incident-summary PDF (repeatable)
        #[arg(long)]
        url: Vec<String>,
        /// Per-document fetch timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
        /// Output format: `json` or `csv`
        #[arg(long, default_value = "json")]
        format: String,
        /// Output path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            files,
            url,
            clusters,
            encoder,
            batch_size,
            timeout,
            format,
            output,
        } => {
            let options = pipeline::AnalyzeOptions {
                clusters,
                encoder,
                batch_size,
                timeout,
                format: format.parse()?,
                output,
            };
            pipeline::analyze(&files, &url, &options).await?;
        }
        Commands::Extract {
            files,
            url,
            timeout,
            format,
            output,
        } => {
            pipeline::extract(&files, &url, timeout, format.parse()?, output.as_deref()).await?;
        }
    }

    Ok(())
}
