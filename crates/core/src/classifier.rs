//! Product name → grocery category.
//!
//! Product names usually end with the item itself ("Pams Low Fat Milk"), so
//! candidate words are tried from the end toward the start.

use crate::embeddings::{BuildStats, EmbeddingStore};
use crate::fuzzy::FuzzyMatcher;
use crate::index::LookupIndex;
use crate::matcher::Matcher;
use crate::models::{ClassificationResult, MatchType};
use crate::taxonomy::Taxonomy;
use crate::tokenizer::Tokenizer;
use crate::ClassifierError;
use providers::EmbeddingProvider;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info};

/// Confidence reported when only the full matcher found a category.
pub const FALLBACK_CONFIDENCE: f32 = 0.7;

pub struct ClassifierOptions {
    pub tokenizer: Tokenizer,
    pub fuzzy: Box<dyn FuzzyMatcher>,
    pub fuzzy_cutoff: f64,
    pub threshold: f32,
    pub batch_size: usize,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            fuzzy: Box::new(crate::fuzzy::SequenceRatio),
            fuzzy_cutoff: 0.8,
            threshold: 0.6,
            batch_size: 64,
        }
    }
}

/// Built once, then shared (typically behind an `Arc`) for concurrent use.
pub struct ProductClassifier {
    taxonomy: Taxonomy,
    tokenizer: Tokenizer,
    matcher: Matcher,
    build_stats: BuildStats,
}

impl ProductClassifier {
    /// Builds the lookup index and keyword embeddings. Fails if the provider
    /// cannot embed the taxonomy.
    pub async fn build(
        taxonomy: Taxonomy,
        provider: Arc<dyn EmbeddingProvider>,
        cache: Option<&SqlitePool>,
        options: ClassifierOptions,
    ) -> Result<Self, ClassifierError> {
        let index = LookupIndex::build(&taxonomy);
        let keywords = taxonomy.unique_keywords();
        let (store, build_stats) =
            EmbeddingStore::build(&keywords, provider.as_ref(), options.batch_size, cache).await?;
        info!(
            "classifier ready: {} categories, {} index keys, model {}",
            taxonomy.categories().len(),
            index.len(),
            store.model_id()
        );
        let matcher = Matcher::new(
            index,
            store,
            provider,
            options.fuzzy,
            options.fuzzy_cutoff,
            options.threshold,
        );
        Ok(Self {
            taxonomy,
            tokenizer: options.tokenizer,
            matcher,
            build_stats,
        })
    }

    pub async fn classify(&self, product_name: &str) -> Result<ClassificationResult, ClassifierError> {
        let words = self.tokenizer.extract_words(product_name);
        if words.is_empty() {
            return Ok(ClassificationResult::unknown());
        }
        let specific = self.tokenizer.specific_words(&words);

        for word in specific.iter().rev() {
            if let Some(category) = self.matcher.exact(word) {
                debug!("{:?}: exact hit on {:?}", product_name, word);
                return Ok(ClassificationResult {
                    category: category.to_string(),
                    confidence: 1.0,
                    matched_word: word.clone(),
                    match_type: MatchType::ExactSpecificWord,
                });
            }
        }

        for word in specific.iter().rev() {
            let outcome = self.matcher.find_category(word).await?;
            if let Some(category) = outcome.category {
                debug!(
                    "{:?}: {} match {:?} -> {:?}",
                    product_name, outcome.match_type, word, outcome.matched_word
                );
                return Ok(ClassificationResult {
                    category,
                    confidence: FALLBACK_CONFIDENCE,
                    matched_word: outcome.matched_word,
                    match_type: MatchType::LastSpecificWord,
                });
            }
        }

        debug!("{:?}: no category", product_name);
        Ok(ClassificationResult::unknown())
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn build_stats(&self) -> BuildStats {
        self.build_stats
    }
}
