use crate::ClassifierError;
use providers::{EmbeddingProvider, ProviderError};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// One embedding per distinct taxonomy keyword, in taxonomy order.
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    model_id: String,
    dimension: usize,
    entries: Vec<(String, Vec<f32>)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub keywords: usize,
    pub cache_hits: usize,
    pub embedded: usize,
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}

impl EmbeddingStore {
    /// Embeds every keyword, reusing vectors cached under the provider's model
    /// id and writing fresh ones back. Provider failures are fatal here; cache
    /// failures only cost a recompute.
    pub async fn build(
        keywords: &[String],
        provider: &dyn EmbeddingProvider,
        batch_size: usize,
        cache: Option<&SqlitePool>,
    ) -> Result<(Self, BuildStats), ClassifierError> {
        let model_id = provider.model_id();
        let mut cached = match cache {
            Some(pool) => storage::cache::load_vectors(pool, &model_id, keywords)
                .await
                .unwrap_or_else(|e| {
                    warn!("embedding cache read failed, recomputing: {:#}", e);
                    Default::default()
                }),
            None => Default::default(),
        };

        let misses: Vec<String> = keywords
            .iter()
            .filter(|k| !cached.contains_key(*k))
            .cloned()
            .collect();
        let batch = batch_size.min(provider.max_batch_size()).max(1);
        let mut fresh: Vec<(String, Vec<f32>)> = Vec::with_capacity(misses.len());
        for chunk in misses.chunks(batch) {
            let resp = provider.embed(chunk).await.map_err(ClassifierError::Build)?;
            if resp.vectors.len() != chunk.len() {
                return Err(ClassifierError::Build(ProviderError::InvalidResponse(format!(
                    "requested {} embeddings, got {}",
                    chunk.len(),
                    resp.vectors.len()
                ))));
            }
            fresh.extend(chunk.iter().cloned().zip(resp.vectors));
        }

        if let (Some(pool), false) = (cache, fresh.is_empty()) {
            if let Err(e) = storage::cache::store_vectors(pool, &model_id, &fresh).await {
                warn!("embedding cache write failed: {:#}", e);
            }
        }

        let stats = BuildStats {
            keywords: keywords.len(),
            cache_hits: keywords.len() - misses.len(),
            embedded: fresh.len(),
        };
        for (keyword, vector) in fresh {
            cached.insert(keyword, vector);
        }
        let entries = keywords
            .iter()
            .filter_map(|k| cached.remove(k).map(|v| (k.clone(), v)))
            .collect();
        let store = Self::from_vectors(model_id, entries)?;
        info!(
            "embedding store ready: {} keywords, {} from cache, {} embedded ({} dims)",
            stats.keywords, stats.cache_hits, stats.embedded, store.dimension
        );
        Ok((store, stats))
    }

    /// Wraps precomputed vectors, checking they all share one non-zero dimension.
    pub fn from_vectors(
        model_id: String,
        entries: Vec<(String, Vec<f32>)>,
    ) -> Result<Self, ClassifierError> {
        let dimension = entries.first().map(|(_, v)| v.len()).unwrap_or(0);
        if !entries.is_empty() && dimension == 0 {
            return Err(ClassifierError::Build(ProviderError::InvalidResponse(
                "provider returned empty vectors".into(),
            )));
        }
        if let Some((_, v)) = entries.iter().find(|(_, v)| v.len() != dimension) {
            return Err(ClassifierError::DimensionMismatch {
                expected: dimension,
                found: v.len(),
            });
        }
        Ok(Self {
            model_id,
            dimension,
            entries,
        })
    }

    /// Highest-scoring keyword by cosine similarity. Scans every entry; the
    /// first keyword wins a tie.
    pub fn nearest(&self, query: &[f32]) -> Result<Option<(&str, f32)>, ClassifierError> {
        if !self.entries.is_empty() && query.len() != self.dimension {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.dimension,
                found: query.len(),
            });
        }
        let mut best: Option<(&str, f32)> = None;
        for (keyword, vector) in &self.entries {
            let score = cosine_similarity(query, vector);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((keyword.as_str(), score));
            }
        }
        Ok(best)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
