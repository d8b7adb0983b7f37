//! Local embedding provider using fastembed ONNX models.

use crate::{EmbedResponse, EmbeddingProvider, ProviderError};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct LocalProvider {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
}

impl LocalProvider {
    /// Loads (downloading on first use) the named sentence-embedding model.
    pub fn new(model_name: &str) -> Result<Self, ProviderError> {
        let model = parse_model_name(model_name)?;
        let options = InitOptions::new(model).with_show_download_progress(false);
        let text_model = TextEmbedding::try_new(options)
            .map_err(|e| ProviderError::RequestFailed(format!("{}: {}", model_name, e)))?;
        Ok(Self {
            model: Arc::new(Mutex::new(text_model)),
            model_name: model_name.to_string(),
        })
    }
}

fn parse_model_name(model_name: &str) -> Result<EmbeddingModel, ProviderError> {
    match model_name {
        "sentence-transformers/all-MiniLM-L6-v2" | "all-MiniLM-L6-v2" => {
            Ok(EmbeddingModel::AllMiniLML6V2)
        }
        "sentence-transformers/all-MiniLM-L12-v2" | "all-MiniLM-L12-v2" => {
            Ok(EmbeddingModel::AllMiniLML12V2)
        }
        "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        _ => Err(ProviderError::UnknownProvider(format!(
            "unsupported local model {}; supported: all-MiniLM-L6-v2, all-MiniLM-L12-v2, \
             bge-small-en-v1.5, bge-base-en-v1.5",
            model_name
        ))),
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for LocalProvider {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        if texts.is_empty() {
            return Ok(EmbedResponse { vectors: vec![] });
        }
        let texts = texts.to_vec();
        let model = self.model.clone();

        // fastembed is synchronous
        let vectors = tokio::task::spawn_blocking(move || {
            let mut model = model.blocking_lock();
            model.embed(texts, None)
        })
        .await
        .map_err(|e| ProviderError::RequestFailed(format!("task join error: {}", e)))?
        .map_err(|e| ProviderError::RequestFailed(format!("embedding failed: {}", e)))?;

        Ok(EmbedResponse { vectors })
    }

    fn model_id(&self) -> String {
        format!("fastembed:{}", self.model_name)
    }

    fn max_batch_size(&self) -> usize {
        32
    }
}
