//! Deterministic token-hashing embedder.
//!
//! Buckets lowercased whitespace tokens into a fixed-size vector with a
//! seeded hash and L2-normalizes the result. Texts sharing vocabulary land
//! near each other under cosine distance, which is enough structure for
//! exploratory clustering of short incident descriptions without any model
//! files or network access.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use crate::{EncodeError, TextEncoder};

/// Configuration for [`HashEncoder`].
#[derive(Debug, Clone, Copy)]
pub struct HashEncoderConfig {
    /// Output vector length.
    pub dimensions: usize,
    /// Seed mixed into every token hash.
    pub seed: u64,
}

impl Default for HashEncoderConfig {
    fn default() -> Self {
        Self {
            dimensions: 64,
            seed: 1337,
        }
    }
}

/// Seeded bag-of-words hashing encoder.
#[derive(Debug, Clone, Default)]
pub struct HashEncoder {
    config: HashEncoderConfig,
}

impl HashEncoder {
    /// Creates an encoder with the given configuration.
    #[must_use]
    pub const fn new(config: HashEncoderConfig) -> Self {
        Self { config }
    }

    /// Encodes a single text.
    #[must_use]
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let dims = self.config.dimensions.max(1);
        let mut vector = vec![0f32; dims];
        for token in text.split_whitespace() {
            vector[self.bucket_for(token)] += 1.0;
        }
        normalize(&mut vector);
        vector
    }

    fn bucket_for(&self, token: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        hasher.write_u64(self.config.seed);
        token.to_lowercase().hash(&mut hasher);
        (hasher.finish() as usize) % self.config.dimensions.max(1)
    }
}

#[async_trait]
impl TextEncoder for HashEncoder {
    fn dimensions(&self) -> usize {
        self.config.dimensions.max(1)
    }

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EncodeError> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_is_deterministic() {
        let encoder = HashEncoder::default();
        assert_eq!(
            encoder.embed_text("Traffic Stop"),
            encoder.embed_text("Traffic Stop")
        );
    }

    #[test]
    fn embedding_has_configured_dimensionality() {
        let encoder = HashEncoder::new(HashEncoderConfig {
            dimensions: 32,
            seed: 7,
        });
        assert_eq!(encoder.embed_text("Welfare Check").len(), 32);
        assert_eq!(encoder.dimensions(), 32);
    }

    #[test]
    fn non_empty_text_is_unit_length() {
        let encoder = HashEncoder::default();
        let v = encoder.embed_text("Suspicious Person");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn tokenization_is_case_insensitive() {
        let encoder = HashEncoder::default();
        assert_eq!(
            encoder.embed_text("TRAFFIC STOP"),
            encoder.embed_text("traffic stop")
        );
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let encoder = HashEncoder::default();
        assert!(encoder.embed_text("").iter().all(|&x| x == 0.0));
    }

    #[test]
    fn shared_vocabulary_is_closer_than_disjoint() {
        let encoder = HashEncoder::default();
        let a = encoder.embed_text("Traffic Stop");
        let b = encoder.embed_text("Traffic Accident");
        let c = encoder.embed_text("Welfare Check");

        let dot = |x: &[f32], y: &[f32]| -> f32 { x.iter().zip(y).map(|(a, b)| a * b).sum() };
        // "traffic" alone guarantees 0.5 similarity; the disjoint pair can
        // only overlap through bucket collisions.
        assert!(dot(&a, &b) > 0.4);
        assert!(dot(&a, &c) < 0.9);
    }
}
