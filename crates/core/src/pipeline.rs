use crate::classifier::{ClassifierOptions, ProductClassifier};
use crate::config::AppConfig;
use crate::models::ClassificationResult;
use crate::taxonomy::Taxonomy;
use crate::tokenizer::{Tokenizer, DEFAULT_DESCRIPTIVE_WORDS, DEFAULT_IGNORE_WORDS};
use crate::{fuzzy, ClassifierError};
use anyhow::Context;
use providers::hashing::HashingProvider;
use providers::openai::{OpenAiConfig, OpenAiProvider};
use providers::ProviderRegistry;
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub fn build_registry(config: &AppConfig) -> ProviderRegistry {
    let mut reg = ProviderRegistry::new().with_embedding(
        "hashing",
        Arc::new(HashingProvider::new(config.embeddings.dimension)),
    );

    if let (Some(key), Some(base)) = (
        std::env::var_os("OPENAI_API_KEY"),
        std::env::var_os("OPENAI_BASE_URL"),
    ) {
        let provider = OpenAiProvider::new(OpenAiConfig {
            api_key: key.to_string_lossy().into_owned(),
            base_url: base.to_string_lossy().into_owned(),
            embedding_model: config.embeddings.model.clone(),
        });
        reg = reg.with_embedding("openai", Arc::new(provider));
    }

    #[cfg(feature = "local")]
    if config.embeddings.provider == "local" {
        match providers::local::LocalProvider::new(&config.embeddings.model) {
            Ok(provider) => reg = reg.with_embedding("local", Arc::new(provider)),
            Err(e) => warn!("local embedding model unavailable: {}", e),
        }
    }

    reg.set_preferred_embedding(&config.embeddings.provider)
}

pub fn load_taxonomy(config: &AppConfig) -> Result<Taxonomy, ClassifierError> {
    match &config.classifier.taxonomy_path {
        Some(path) => Taxonomy::load(Path::new(path)),
        None => Ok(Taxonomy::builtin()),
    }
}

pub fn classifier_options(config: &AppConfig) -> ClassifierOptions {
    let defaults = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
    let ignore = config
        .classifier
        .ignore_words
        .clone()
        .unwrap_or_else(|| defaults(DEFAULT_IGNORE_WORDS));
    let descriptive = config
        .classifier
        .descriptive_words
        .clone()
        .unwrap_or_else(|| defaults(DEFAULT_DESCRIPTIVE_WORDS));
    ClassifierOptions {
        tokenizer: Tokenizer::new(&ignore, &descriptive),
        fuzzy: fuzzy::from_backend(config.fuzzy.backend),
        fuzzy_cutoff: config.fuzzy.cutoff,
        threshold: config.classifier.threshold,
        batch_size: config.embeddings.batch_size,
    }
}

/// Opens the embedding cache, or `None` when caching is disabled.
pub async fn open_cache(config: &AppConfig) -> Result<Option<SqlitePool>, ClassifierError> {
    if !config.cache.enabled {
        return Ok(None);
    }
    let pool = storage::connect(&config.cache.path)
        .await
        .map_err(|e| ClassifierError::Cache(format!("{}: {:#}", config.cache.path, e)))?;
    storage::migrate(&pool)
        .await
        .map_err(|e| ClassifierError::Cache(format!("migrate: {:#}", e)))?;
    Ok(Some(pool))
}

/// Builds the engine described by `config`. Run once at startup and share the
/// result.
pub async fn build_classifier(config: &AppConfig) -> anyhow::Result<ProductClassifier> {
    let registry = build_registry(config);
    debug!("embedding providers: {:?}", registry.names());
    let provider = registry
        .embedding(None)
        .with_context(|| format!("embedding provider {:?}", config.embeddings.provider))?;
    let taxonomy = load_taxonomy(config).context("load taxonomy")?;
    let cache = match open_cache(config).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!("{}; continuing without cache", e);
            None
        }
    };
    let classifier = ProductClassifier::build(
        taxonomy,
        provider,
        cache.as_ref(),
        classifier_options(config),
    )
    .await
    .context("build classifier")?;
    if let Some(pool) = cache {
        pool.close().await;
    }
    Ok(classifier)
}

#[derive(Debug)]
pub struct BatchItem {
    pub name: String,
    pub outcome: Result<ClassificationResult, ClassifierError>,
}

impl BatchItem {
    /// A failed classification counts as Unknown for callers that only need
    /// a label.
    pub fn result_or_unknown(&self) -> ClassificationResult {
        match &self.outcome {
            Ok(result) => result.clone(),
            Err(_) => ClassificationResult::unknown(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub classified: usize,
    pub unknown: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_items(items: &[BatchItem]) -> Self {
        let mut summary = BatchSummary {
            total: items.len(),
            ..Default::default()
        };
        for item in items {
            match &item.outcome {
                Ok(r) if r.is_unknown() => summary.unknown += 1,
                Ok(_) => summary.classified += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Classifies `names` with at most `concurrency` calls in flight. Results come
/// back in input order; one failure never stops the rest.
pub async fn classify_batch(
    classifier: Arc<ProductClassifier>,
    names: Vec<String>,
    concurrency: usize,
) -> Vec<BatchItem> {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut set = JoinSet::new();
    for (idx, name) in names.iter().cloned().enumerate() {
        let classifier = classifier.clone();
        let permits = permits.clone();
        set.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let outcome = classifier.classify(&name).await;
            (idx, outcome)
        });
    }

    let mut outcomes: Vec<Option<Result<ClassificationResult, ClassifierError>>> =
        names.iter().map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((idx, outcome)) => outcomes[idx] = Some(outcome),
            Err(e) => warn!("classification task failed: {}", e),
        }
    }

    let items: Vec<BatchItem> = names
        .into_iter()
        .zip(outcomes)
        .map(|(name, outcome)| {
            let outcome = outcome.unwrap_or_else(|| {
                Err(ClassifierError::Aborted("task panicked or was cancelled".into()))
            });
            if let Err(e) = &outcome {
                warn!("could not classify {:?}: {}", name, e);
            }
            BatchItem { name, outcome }
        })
        .collect();
    let summary = BatchSummary::from_items(&items);
    info!(
        "batch done: {} total, {} classified, {} unknown, {} failed",
        summary.total, summary.classified, summary.unknown, summary.failed
    );
    items
}
