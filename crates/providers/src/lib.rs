//! Provider abstractions for text embeddings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod hashing;
#[cfg(feature = "local")]
pub mod local;
pub mod openai;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub vectors: Vec<Vec<f32>>,
}

#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError>;

    /// Identity of the underlying model. Vectors are only comparable when
    /// this matches, so it also keys the persistent cache.
    fn model_id(&self) -> String;

    fn max_batch_size(&self) -> usize {
        256
    }
}

/// Embed a single text, checking that the provider returned exactly one vector.
pub async fn embed_one(
    provider: &dyn EmbeddingProvider,
    text: &str,
) -> Result<Vec<f32>, ProviderError> {
    let resp = provider.embed(&[text.to_string()]).await?;
    let mut vectors = resp.vectors.into_iter();
    match (vectors.next(), vectors.next()) {
        (Some(v), None) => Ok(v),
        _ => Err(ProviderError::InvalidResponse(format!(
            "expected one vector for {:?}",
            text
        ))),
    }
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    embeddings: HashMap<String, Arc<dyn EmbeddingProvider>>,
    pub preferred_embedding: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embedding(mut self, name: &str, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embeddings.insert(name.to_string(), provider);
        self
    }

    pub fn set_preferred_embedding(mut self, name: &str) -> Self {
        self.preferred_embedding = Some(name.to_string());
        self
    }

    pub fn embedding(
        &self,
        name: Option<&str>,
    ) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred_embedding.clone())
            .ok_or_else(|| {
                ProviderError::UnknownProvider("no embedding provider configured".into())
            })?;
        self.embeddings
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(key))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.embeddings.keys().cloned().collect();
        names.sort();
        names
    }
}
