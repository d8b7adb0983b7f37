use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub fuzzy: FuzzyConfig,
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Minimum cosine similarity (exclusive) for a semantic match.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// TOML taxonomy replacing the built-in one.
    #[serde(default)]
    pub taxonomy_path: Option<String>,
    #[serde(default)]
    pub ignore_words: Option<Vec<String>>,
    #[serde(default)]
    pub descriptive_words: Option<Vec<String>>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            taxonomy_path: None,
            ignore_words: None,
            descriptive_words: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyBackend {
    Ratio,
    JaroWinkler,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyConfig {
    #[serde(default = "default_fuzzy_backend")]
    pub backend: FuzzyBackend,
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            backend: default_fuzzy_backend(),
            cutoff: default_cutoff(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Vector size for the hashing provider.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            batch_size: default_batch_size(),
            dimension: default_dimension(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_path")]
    pub path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_cache_path(),
        }
    }
}

fn default_threshold() -> f32 {
    0.6
}

fn default_fuzzy_backend() -> FuzzyBackend {
    FuzzyBackend::Ratio
}

fn default_cutoff() -> f64 {
    0.8
}

fn default_provider() -> String {
    "hashing".to_string()
}

fn default_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_batch_size() -> usize {
    64
}

fn default_dimension() -> usize {
    256
}

fn default_true() -> bool {
    true
}

fn default_cache_path() -> String {
    "data/embeddings.db".to_string()
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("GROCER")
            .prefix_separator("_")
            .separator("__"),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;

    // Serializes tests that read the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn empty_file_yields_defaults() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("empty.toml");
        fs::write(&path, "").unwrap();
        let cfg = load(Some(&path.to_string_lossy())).unwrap();
        assert_eq!(cfg.classifier.threshold, 0.6);
        assert_eq!(cfg.fuzzy.backend, FuzzyBackend::Ratio);
        assert_eq!(cfg.fuzzy.cutoff, 0.8);
        assert_eq!(cfg.embeddings.provider, "hashing");
        assert!(cfg.cache.enabled);
    }

    #[test]
    fn file_values_override_defaults() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(
            &path,
            r#"
            [classifier]
            threshold = 0.75
            descriptive_words = ["organic"]

            [fuzzy]
            backend = "jaro_winkler"
            cutoff = 0.9

            [cache]
            enabled = false
            "#,
        )
        .unwrap();
        let cfg = load(Some(&path.to_string_lossy())).unwrap();
        assert_eq!(cfg.classifier.threshold, 0.75);
        assert_eq!(
            cfg.classifier.descriptive_words,
            Some(vec!["organic".to_string()])
        );
        assert_eq!(cfg.fuzzy.backend, FuzzyBackend::JaroWinkler);
        assert!(!cfg.cache.enabled);
        assert_eq!(cfg.embeddings.batch_size, 64);
    }

    #[test]
    fn env_vars_override_file_values() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("env.toml");
        fs::write(&path, "[classifier]\nthreshold = 0.5\n").unwrap();

        std::env::set_var("GROCER_CLASSIFIER__THRESHOLD", "0.7");
        std::env::set_var("GROCER_CLASSIFIER__TAXONOMY_PATH", "custom.toml");
        let loaded = load(Some(&path.to_string_lossy()));
        std::env::remove_var("GROCER_CLASSIFIER__THRESHOLD");
        std::env::remove_var("GROCER_CLASSIFIER__TAXONOMY_PATH");

        let cfg = loaded.unwrap();
        assert_eq!(cfg.classifier.threshold, 0.7);
        assert_eq!(cfg.classifier.taxonomy_path.as_deref(), Some("custom.toml"));
    }
}
