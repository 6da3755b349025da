#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pluggable text-to-vector encoders for incident descriptions.
//!
//! Downstream clustering only relies on cosine distance between fixed-size
//! vectors, so any backend that produces semantically meaningful sentence
//! vectors can stand behind the [`TextEncoder`] trait:
//!
//! - [`hash::HashEncoder`]: deterministic seeded token-hashing embedder.
//!   No network, no model files; the default backend and the one tests run
//!   against.
//! - [`remote::RemoteEncoder`]: an OpenAI-compatible `/v1/embeddings`
//!   endpoint for real sentence-transformer vectors.
//!
//! Encoding is the dominant cost of the analysis pipeline; [`encode_all`]
//! batches requests ([`DEFAULT_BATCH_SIZE`] rows at a time, tunable).

pub mod hash;
pub mod remote;

use async_trait::async_trait;
use strum_macros::{AsRefStr, Display, EnumString};

/// Rows encoded per backend call unless the caller overrides it.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Errors that can occur while encoding text.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// HTTP request to a remote embedding endpoint failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success status.
    #[error("embedding endpoint returned {status}: {body}")]
    Endpoint {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// A required configuration value is missing.
    #[error("missing configuration: {message}")]
    Config {
        /// Description of the missing value.
        message: String,
    },

    /// The backend returned a different number of vectors than inputs.
    #[error("encoder returned {found} vectors for {expected} inputs")]
    Misaligned {
        /// Number of input texts.
        expected: usize,
        /// Number of vectors returned.
        found: usize,
    },
}

/// A text-to-vector encoder with fixed output dimensionality.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// Length of every vector this encoder produces.
    fn dimensions(&self) -> usize;

    /// Encodes one batch of texts, one vector per input, in order.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the backend fails.
    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EncodeError>;
}

/// Which encoder backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum EncoderKind {
    /// Deterministic token-hashing embedder (offline).
    Hash,
    /// OpenAI-compatible embeddings endpoint.
    Remote,
}

/// Environment variable selecting the encoder backend.
pub const ENCODER_ENV: &str = "BLOTTER_ENCODER";

impl EncoderKind {
    /// Reads the backend selection from [`ENCODER_ENV`], defaulting to
    /// [`Self::Hash`] when unset or unrecognized.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(ENCODER_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::Hash)
    }

    /// Builds the encoder for this backend.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Config`] if the remote backend is selected
    /// but its API key is not configured.
    pub fn build(self) -> Result<Box<dyn TextEncoder>, EncodeError> {
        match self {
            Self::Hash => Ok(Box::new(hash::HashEncoder::default())),
            Self::Remote => Ok(Box::new(remote::RemoteEncoder::from_env()?)),
        }
    }
}

/// Encodes all texts through `encoder`, `batch_size` rows at a time.
///
/// # Errors
///
/// Returns the first [`EncodeError`] from the backend, or
/// [`EncodeError::Misaligned`] if a batch comes back with the wrong
/// number of vectors.
pub async fn encode_all(
    encoder: &dyn TextEncoder,
    texts: &[&str],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, EncodeError> {
    let batch_size = batch_size.max(1);
    let mut vectors = Vec::with_capacity(texts.len());

    for batch in texts.chunks(batch_size) {
        let encoded = encoder.encode_batch(batch).await?;
        if encoded.len() != batch.len() {
            return Err(EncodeError::Misaligned {
                expected: batch.len(),
                found: encoded.len(),
            });
        }
        vectors.extend(encoded);
    }

    log::debug!(
        "Encoded {} text(s) into {}-dimensional vectors",
        vectors.len(),
        encoder.dimensions()
    );

    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoder_kind_parses_lowercase_names() {
        assert_eq!("hash".parse::<EncoderKind>().unwrap(), EncoderKind::Hash);
        assert_eq!(
            "remote".parse::<EncoderKind>().unwrap(),
            EncoderKind::Remote
        );
        assert!("minilm".parse::<EncoderKind>().is_err());
    }

    #[tokio::test]
    async fn encode_all_batches_preserve_input_order() {
        let encoder = hash::HashEncoder::default();
        let texts: Vec<String> = (0..130).map(|i| format!("incident number {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

        let chunked = encode_all(&encoder, &refs, 64).await.unwrap();
        let whole = encode_all(&encoder, &refs, usize::MAX).await.unwrap();

        assert_eq!(chunked.len(), 130);
        assert_eq!(chunked, whole);
    }
}
