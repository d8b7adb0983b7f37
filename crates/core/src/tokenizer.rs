//! Word extraction from free-text product names.

use std::collections::HashSet;

pub const DEFAULT_IGNORE_WORDS: &[&str] = &[
    "pams", "brushed", "mix", "bag", "wash", "woolworths", "fresh", "bagged", "value", "kg", "g",
    "ml", "l", "pack", "pk", "ea", "prepacked",
];

/// Flavour and quality adjectives that never identify the product itself.
pub const DEFAULT_DESCRIPTIVE_WORDS: &[&str] = &[
    "smooth", "creamy", "fresh", "low", "fat", "high", "light", "original", "classic", "new",
    "traditional", "premium", "best", "natural", "strawberry", "chocolate", "vanilla",
    "blueberry", "raspberry", "caramel", "apple", "lemon",
];

/// Trailing words that describe a cut or format rather than the item
/// ("Avocado Half", "Pizza Base").
const SUFFIX_WORDS: &[&str] = &["half", "base"];

#[derive(Debug, Clone)]
pub struct Tokenizer {
    ignore: HashSet<String>,
    descriptive: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_WORDS, DEFAULT_DESCRIPTIVE_WORDS)
    }
}

impl Tokenizer {
    pub fn new<S: AsRef<str>>(ignore: &[S], descriptive: &[S]) -> Self {
        Self {
            ignore: ignore.iter().map(|w| w.as_ref().to_lowercase()).collect(),
            descriptive: descriptive.iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    /// Lowercased tokens of `name` before any parenthesised suffix, with
    /// ignored words and anything containing a digit removed.
    pub fn extract_words(&self, name: &str) -> Vec<String> {
        let head = name.split('(').next().unwrap_or("").trim();
        head.replace('-', " ")
            .to_lowercase()
            .split_whitespace()
            .filter(|w| !self.ignore.contains(*w))
            .filter(|w| !w.chars().any(|c| c.is_ascii_digit()))
            .map(str::to_string)
            .collect()
    }

    /// The final surviving token, stepping back over a trailing "half"/"base".
    /// Empty when nothing survives.
    pub fn extract_last_word(&self, name: &str) -> String {
        let mut words = self.extract_words(name);
        match words.len() {
            0 => String::new(),
            1 => words.remove(0),
            n => {
                if SUFFIX_WORDS.contains(&words[n - 1].as_str()) {
                    words.swap_remove(n - 2)
                } else {
                    words.swap_remove(n - 1)
                }
            }
        }
    }

    /// Drops descriptive words; if that leaves nothing, keeps the last
    /// original word so classification is still attempted.
    pub fn specific_words(&self, words: &[String]) -> Vec<String> {
        let specific: Vec<String> = words
            .iter()
            .filter(|w| !self.descriptive.contains(w.as_str()))
            .cloned()
            .collect();
        if specific.is_empty() {
            words.last().cloned().into_iter().collect()
        } else {
            specific
        }
    }

    pub fn is_descriptive(&self, word: &str) -> bool {
        self.descriptive.contains(word)
    }
}
