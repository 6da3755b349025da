//! Batch pipeline orchestration: sources → extraction → aggregation →
//! clustering → export.

use std::path::{Path, PathBuf};
use std::time::Duration;

use blotter_analytics::{ClusterOptions, cluster_table, trend};
use blotter_embedding::EncoderKind;
use blotter_incident_models::IncidentTable;
use blotter_source::batch::{BatchResult, process_batch};
use blotter_source::{DocumentSource, FetchOptions};

use crate::export::{self, OutputFormat};

/// Options for the `analyze` subcommand.
pub struct AnalyzeOptions {
    /// Requested cluster count (0 = automatic).
    pub clusters: usize,
    /// Encoder backend name from the command line, if given.
    pub encoder: Option<String>,
    /// Rows per embedding batch.
    pub batch_size: usize,
    /// Per-document fetch timeout in seconds.
    pub timeout: u64,
    /// Export format.
    pub format: OutputFormat,
    /// Export path (stdout when `None`).
    pub output: Option<PathBuf>,
}

/// Runs the full analysis pipeline for one batch.
///
/// # Errors
///
/// Returns an error for unusable configuration (unknown encoder name,
/// out-of-range cluster count, unwritable output); per-document failures
/// only affect the failing document.
pub async fn analyze(
    files: &[PathBuf],
    urls: &[String],
    options: &AnalyzeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(table) = ingest(files, urls, options.timeout).await? else {
        return Ok(());
    };

    let kind = match &options.encoder {
        Some(name) => name.parse::<EncoderKind>()?,
        None => EncoderKind::from_env(),
    };
    let encoder = kind.build()?;
    log::info!("Encoding incident natures with the {kind} backend");

    let cluster_options = ClusterOptions {
        clusters: options.clusters,
        batch_size: options.batch_size,
    };
    let mut clustered = cluster_table(table, encoder.as_ref(), &cluster_options).await?;

    // The trend is all-or-nothing: one malformed timestamp drops the
    // Hour column but never the rest of the export.
    match trend::hours(&clustered.table) {
        Ok(hours) => {
            log_hourly_trend(&trend::counts(&hours));
            clustered.hours = Some(hours);
        }
        Err(e) => log::error!("Hourly trend unavailable: {e}"),
    }

    export::write_clustered(&clustered, options.format, options.output.as_deref())?;
    Ok(())
}

/// Runs extraction only and exports the raw table.
///
/// # Errors
///
/// Returns an error if the output cannot be written; per-document
/// failures only affect the failing document.
pub async fn extract(
    files: &[PathBuf],
    urls: &[String],
    timeout: u64,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(table) = ingest(files, urls, timeout).await? else {
        return Ok(());
    };
    export::write_table(&table, format, output)?;
    Ok(())
}

/// Fetches and extracts the batch, returning the aggregated table or
/// `None` when the batch produced no records (an expected terminal
/// state).
async fn ingest(
    files: &[PathBuf],
    urls: &[String],
    timeout: u64,
) -> Result<Option<IncidentTable>, Box<dyn std::error::Error>> {
    let sources = gather_sources(files, urls);
    if sources.is_empty() {
        log::warn!("No readable input documents were given");
        return Ok(None);
    }

    let fetch_options = FetchOptions {
        timeout: Duration::from_secs(timeout),
    };
    let result = process_batch(&sources, &fetch_options).await?;
    report_outcomes(&result);

    if result.records.is_empty() {
        log::warn!("No incident records were extracted; nothing to analyze");
        return Ok(None);
    }

    Ok(Some(IncidentTable::from_records(result.records)))
}

/// Turns CLI inputs into document sources. Invalid URLs are reported and
/// dropped here, before any fetch, without affecting the rest of the
/// batch.
fn gather_sources(files: &[PathBuf], urls: &[String]) -> Vec<DocumentSource> {
    let mut sources: Vec<DocumentSource> = files.iter().map(DocumentSource::file).collect();

    for url in urls {
        match DocumentSource::url(url) {
            Ok(source) => sources.push(source),
            Err(e) => log::error!("{e}"),
        }
    }

    sources
}

/// Logs the per-document outcome summary.
fn report_outcomes(result: &BatchResult) {
    for outcome in &result.outcomes {
        match &outcome.result {
            Ok(count) => log::info!("{}: {count} record(s)", outcome.source),
            Err(e) => log::error!("{}: {e}", outcome.source),
        }
    }
}

/// Logs the incidents-per-hour distribution.
fn log_hourly_trend(counts: &[u64; 24]) {
    let summary: Vec<String> = counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(hour, count)| format!("{hour:02}h={count}"))
        .collect();
    log::info!("Incidents by hour: {}", summary.join(" "));
}
