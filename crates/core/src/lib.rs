//! Core library: taxonomy, lookup index, tokenizer, fuzzy and semantic
//! matching, and the product classifier that layers them.

pub mod classifier;
pub mod config;
pub mod embeddings;
mod error;
pub mod fuzzy;
pub mod index;
pub mod matcher;
pub mod models;
pub mod pipeline;
pub mod taxonomy;
pub mod tokenizer;

pub use classifier::{ClassifierOptions, ProductClassifier};
pub use error::ClassifierError;
pub use models::{CategoryAssignment, ClassificationResult, MatchType};
pub use taxonomy::Taxonomy;
