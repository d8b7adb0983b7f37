use providers::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid taxonomy: {0}")]
    Taxonomy(String),
    /// The keyword embedding store could not be built; the engine is unusable.
    #[error("failed to build keyword embeddings: {0}")]
    Build(#[source] ProviderError),
    /// A single query embedding failed; other classifications are unaffected.
    #[error("failed to embed {word:?}: {source}")]
    Embedding {
        word: String,
        #[source]
        source: ProviderError,
    },
    #[error("embedding dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("embedding cache: {0}")]
    Cache(String),
    #[error("classification aborted: {0}")]
    Aborted(String),
}

impl ClassifierError {
    /// Whether the error only affects the call that produced it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClassifierError::Embedding { .. }
                | ClassifierError::DimensionMismatch { .. }
                | ClassifierError::Aborted(_)
        )
    }
}
