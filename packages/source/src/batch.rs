//! Per-batch document runner.
//!
//! Processes one user-triggered batch of documents sequentially: fetch the
//! bytes, extract incident records, pool the records in document order.
//! Failures are isolated per document and reported through
//! [`DocumentOutcome`]; the batch always runs to completion.

use blotter_incident_models::IncidentRecord;
use blotter_pdf::ExtractError;

use crate::{DocumentSource, FetchOptions, SourceError, fetch_document};

/// Why a single document produced no records.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document could not be fetched or read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The document bytes could not be turned into incident records.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// The result of processing one document in a batch.
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Reporting label: file name or URL.
    pub source: String,
    /// Number of records extracted, or the reason the document was skipped.
    pub result: Result<usize, DocumentError>,
}

/// Pooled records and per-document outcomes for one batch.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Records from all successful documents, in document order.
    pub records: Vec<IncidentRecord>,
    /// One outcome per input document, in input order.
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchResult {
    /// Returns the number of documents that produced records.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Returns the number of documents that were skipped.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Processes a batch of documents, never aborting on a single document
/// failure.
///
/// An all-failed or record-less batch yields an empty record pool; that is
/// an expected terminal state, not an error.
///
/// # Errors
///
/// Returns [`SourceError::Http`] only if the HTTP client itself cannot be
/// constructed; per-document failures are reported through the outcomes.
pub async fn process_batch(
    sources: &[DocumentSource],
    options: &FetchOptions,
) -> Result<BatchResult, SourceError> {
    let client = reqwest::Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(SourceError::Http)?;

    let mut result = BatchResult::default();

    for source in sources {
        let label = source.label();
        match process_document(&client, source).await {
            Ok(records) => {
                let count = records.len();
                log::info!("[{label}] Extracted {count} record(s)");
                result.records.extend(records);
                result.outcomes.push(DocumentOutcome {
                    source: label,
                    result: Ok(count),
                });
            }
            Err(e) => {
                log::error!("[{label}] Skipped: {e}");
                result.outcomes.push(DocumentOutcome {
                    source: label,
                    result: Err(e),
                });
            }
        }
    }

    log::info!(
        "Batch complete: {} of {} document(s) produced {} record(s)",
        result.succeeded(),
        result.outcomes.len(),
        result.records.len()
    );

    Ok(result)
}

async fn process_document(
    client: &reqwest::Client,
    source: &DocumentSource,
) -> Result<Vec<IncidentRecord>, DocumentError> {
    let bytes = fetch_document(client, source).await?;
    Ok(blotter_pdf::extract_incidents(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreadable_document_does_not_abort_batch() {
        // Not a PDF: extraction fails for this document only.
        let dir = std::env::temp_dir();
        let bogus = dir.join("blotter_batch_test_not_a_pdf.bin");
        std::fs::write(&bogus, b"plain text, not a PDF").unwrap();
        let missing = dir.join("blotter_batch_test_does_not_exist.pdf");

        let sources = vec![
            DocumentSource::file(&bogus),
            DocumentSource::file(&missing),
        ];
        let result = process_batch(&sources, &FetchOptions::default())
            .await
            .unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.succeeded(), 0);
        assert_eq!(result.failed(), 2);
        assert!(result.records.is_empty());
        assert!(matches!(
            result.outcomes[0].result,
            Err(DocumentError::Extract(_))
        ));
        assert!(matches!(
            result.outcomes[1].result,
            Err(DocumentError::Source(SourceError::Io(_)))
        ));

        std::fs::remove_file(&bogus).ok();
    }

    #[test]
    fn invalid_url_is_rejected_before_any_fetch() {
        let err = DocumentSource::url("invalid-url").unwrap_err();
        assert!(matches!(err, SourceError::InvalidUrl { ref url } if url == "invalid-url"));
    }

    #[test]
    fn valid_url_becomes_a_source() {
        let source = DocumentSource::url("https://normanok.gov/daily.pdf").unwrap();
        assert_eq!(source.label(), "https://normanok.gov/daily.pdf");
    }
}
