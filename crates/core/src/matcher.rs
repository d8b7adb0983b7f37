//! Single-word category lookup: exact, then fuzzy, then semantic.

use crate::embeddings::EmbeddingStore;
use crate::fuzzy::FuzzyMatcher;
use crate::index::LookupIndex;
use crate::models::{MatchOutcome, MatchType};
use crate::ClassifierError;
use providers::EmbeddingProvider;
use std::sync::Arc;
use tracing::debug;

/// Confidence reported for any accepted fuzzy match, whatever its ratio.
pub const FUZZY_CONFIDENCE: f32 = 0.9;

pub struct Matcher {
    index: LookupIndex,
    store: EmbeddingStore,
    provider: Arc<dyn EmbeddingProvider>,
    fuzzy: Box<dyn FuzzyMatcher>,
    fuzzy_cutoff: f64,
    threshold: f32,
}

impl Matcher {
    pub fn new(
        index: LookupIndex,
        store: EmbeddingStore,
        provider: Arc<dyn EmbeddingProvider>,
        fuzzy: Box<dyn FuzzyMatcher>,
        fuzzy_cutoff: f64,
        threshold: f32,
    ) -> Self {
        Self {
            index,
            store,
            provider,
            fuzzy,
            fuzzy_cutoff,
            threshold,
        }
    }

    pub fn index(&self) -> &LookupIndex {
        &self.index
    }

    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn exact(&self, word: &str) -> Option<&str> {
        self.index.get(word)
    }

    /// Errors only when the query word cannot be embedded.
    pub async fn find_category(&self, word: &str) -> Result<MatchOutcome, ClassifierError> {
        if let Some(category) = self.index.get(word) {
            return Ok(MatchOutcome {
                category: Some(category.to_string()),
                matched_word: word.to_string(),
                score: 1.0,
                match_type: MatchType::Exact,
            });
        }

        let fuzzy = self
            .fuzzy
            .best_match(word, &mut self.index.keys(), self.fuzzy_cutoff);
        if let Some((keyword, ratio)) = fuzzy {
            if let Some(category) = self.index.get(keyword) {
                debug!("fuzzy {:?} -> {:?} (ratio {:.3})", word, keyword, ratio);
                return Ok(MatchOutcome {
                    category: Some(category.to_string()),
                    matched_word: keyword.to_string(),
                    score: FUZZY_CONFIDENCE,
                    match_type: MatchType::Fuzzy,
                });
            }
        }

        if word.is_empty() {
            return Ok(MatchOutcome::none(word));
        }

        let query = providers::embed_one(self.provider.as_ref(), word)
            .await
            .map_err(|source| ClassifierError::Embedding {
                word: word.to_string(),
                source,
            })?;
        if let Some((keyword, score)) = self.store.nearest(&query)? {
            debug!("semantic {:?} -> {:?} (cosine {:.3})", word, keyword, score);
            if score > self.threshold {
                if let Some(category) = self.index.get(keyword) {
                    return Ok(MatchOutcome {
                        category: Some(category.to_string()),
                        matched_word: keyword.to_string(),
                        score,
                        match_type: MatchType::Semantic,
                    });
                }
            }
        }

        Ok(MatchOutcome::none(word))
    }
}
