#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Document sources and the per-batch document runner.
//!
//! Each input document is identified either by a local file path or by a
//! URL. URLs are validated syntactically ([`url_check`]) before any network
//! access; fetching is time-bounded; and a single failing document never
//! aborts the batch: the runner ([`batch`]) reports a per-document
//! [`batch::DocumentOutcome`] instead.

pub mod batch;
pub mod url_check;

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors that can occur while resolving or fetching a document.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The provided remote location failed the syntactic validity check.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
    },

    /// HTTP request failed (network error, bad status, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Local file read failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for fetching documents.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-request timeout for remote documents.
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// A single input document, local or remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// A locally provided file.
    File(PathBuf),
    /// A remote document, already past the syntactic URL check.
    Url(String),
}

impl DocumentSource {
    /// Creates a local file source.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Creates a remote source after validating the URL.
    ///
    /// Rejected URLs never reach the fetch step.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if `url` does not look like a
    /// hostname with a plausible TLD.
    pub fn url(url: &str) -> Result<Self, SourceError> {
        if url_check::is_valid_url(url) {
            Ok(Self::Url(url.to_owned()))
        } else {
            Err(SourceError::InvalidUrl {
                url: url.to_owned(),
            })
        }
    }

    /// Human-readable label for reporting: the file name for local files,
    /// the full URL for remote documents.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path
                .file_name()
                .map_or_else(|| path.display().to_string(), |name| name.display().to_string()),
            Self::Url(url) => url.clone(),
        }
    }
}

/// Fetches the raw bytes of a document.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if a local read fails and
/// [`SourceError::Http`] if the download fails or returns an error status.
pub async fn fetch_document(
    client: &reqwest::Client,
    source: &DocumentSource,
) -> Result<Vec<u8>, SourceError> {
    match source {
        DocumentSource::File(path) => Ok(read_file(path).await?),
        DocumentSource::Url(url) => {
            let response = client.get(url).send().await?.error_for_status()?;
            let bytes = response.bytes().await?;
            log::debug!("Downloaded {} bytes from {url}", bytes.len());
            Ok(bytes.to_vec())
        }
    }
}

async fn read_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let bytes = tokio::fs::read(path).await?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}
