//! OpenAI-compatible remote embedding backend.
//!
//! Posts batches of texts to a `/v1/embeddings` endpoint and returns the
//! model's vectors. Endpoint, model, and API key come from the
//! environment so the backend works against api.openai.com or any
//! self-hosted server speaking the same protocol.

use async_trait::async_trait;
use serde::Deserialize;

use crate::{EncodeError, TextEncoder};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the embeddings endpoint URL.
pub const ENDPOINT_ENV: &str = "BLOTTER_EMBEDDING_URL";

/// Environment variable overriding the embedding model name.
pub const MODEL_ENV: &str = "BLOTTER_EMBEDDING_MODEL";

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";
const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Output dimensionality of the default model.
const DEFAULT_DIMENSIONS: usize = 1536;

/// Client for an OpenAI-compatible embeddings endpoint.
#[derive(Debug, Clone)]
pub struct RemoteEncoder {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    dimensions: usize,
}

impl RemoteEncoder {
    /// Creates an encoder for the given endpoint and model.
    #[must_use]
    pub fn new(endpoint: &str, model: &str, api_key: &str, dimensions: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_owned(),
            model: model.to_owned(),
            api_key: api_key.to_owned(),
            dimensions,
        }
    }

    /// Builds an encoder from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Config`] if [`API_KEY_ENV`] is not set.
    pub fn from_env() -> Result<Self, EncodeError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| EncodeError::Config {
            message: format!("{API_KEY_ENV} is required for the remote encoder"),
        })?;
        let endpoint =
            std::env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_owned());
        let model = std::env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());

        Ok(Self::new(&endpoint, &model, &api_key, DEFAULT_DIMENSIONS))
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl TextEncoder for RemoteEncoder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EncodeError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EncodeError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;

        log::debug!(
            "Remote encoder returned {} vector(s) from {}",
            parsed.data.len(),
            self.endpoint
        );

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}
