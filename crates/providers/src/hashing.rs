use crate::{EmbedResponse, EmbeddingProvider, ProviderError};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic offline embedder: signed FNV-1a feature hashing of character
/// trigrams, L2-normalized. Texts sharing spelling land close together, which
/// is enough for tests and for running without a model.
#[derive(Debug, Clone)]
pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimension];
        let padded: Vec<char> = format!(" {} ", text.trim().to_lowercase())
            .chars()
            .collect();
        let mut buf = [0u8; 12];
        for window in padded.windows(3) {
            let mut len = 0;
            for c in window {
                len += c.encode_utf8(&mut buf[len..]).len();
            }
            let hash = fnv1a(&buf[..len]);
            let idx = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vec[idx] += sign;
        }
        let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in vec.iter_mut() {
                *x /= norm;
            }
        }
        vec
    }
}

impl Default for HashingProvider {
    fn default() -> Self {
        Self::new(256)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingProvider {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        Ok(EmbedResponse {
            vectors: texts.iter().map(|t| self.embed_text(t)).collect(),
        })
    }

    fn model_id(&self) -> String {
        format!("hashing-fnv1a-trigram-{}", self.dimension)
    }

    fn max_batch_size(&self) -> usize {
        usize::MAX
    }
}
