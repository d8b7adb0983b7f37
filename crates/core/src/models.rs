use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    ExactSpecificWord,
    LastSpecificWord,
    Exact,
    Fuzzy,
    Semantic,
    None,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::ExactSpecificWord => "exact_specific_word",
            MatchType::LastSpecificWord => "last_specific_word",
            MatchType::Exact => "exact",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Semantic => "semantic",
            MatchType::None => "none",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: String,
    pub confidence: f32,
    pub matched_word: String,
    pub match_type: MatchType,
}

impl ClassificationResult {
    pub fn unknown() -> Self {
        Self {
            category: UNKNOWN_CATEGORY.to_string(),
            confidence: 0.0,
            matched_word: String::new(),
            match_type: MatchType::None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.match_type == MatchType::None
    }

    /// Labels to attach to a stored product: the category and the matched
    /// word in sentence case. `None` for an unknown result.
    pub fn assignment(&self) -> Option<CategoryAssignment> {
        if self.is_unknown() {
            return None;
        }
        let label = sentence_case(&self.matched_word);
        Some(CategoryAssignment {
            category: self.category.clone(),
            categories: vec![self.category.clone(), label.clone()],
            label,
        })
    }
}

/// Outcome of a single-word lookup by the matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub category: Option<String>,
    pub matched_word: String,
    pub score: f32,
    pub match_type: MatchType,
}

impl MatchOutcome {
    pub fn none(word: &str) -> Self {
        Self {
            category: None,
            matched_word: word.to_string(),
            score: 0.0,
            match_type: MatchType::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAssignment {
    pub category: String,
    pub label: String,
    pub categories: Vec<String>,
}

fn sentence_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_type_serializes_snake_case() {
        let json = serde_json::to_string(&MatchType::ExactSpecificWord).unwrap();
        assert_eq!(json, "\"exact_specific_word\"");
        assert_eq!(MatchType::LastSpecificWord.to_string(), "last_specific_word");
    }

    #[test]
    fn assignment_uses_sentence_case_label() {
        let result = ClassificationResult {
            category: "Dairy & Eggs".into(),
            confidence: 0.7,
            matched_word: "greek YOGURT".into(),
            match_type: MatchType::LastSpecificWord,
        };
        let a = result.assignment().unwrap();
        assert_eq!(a.label, "Greek yogurt");
        assert_eq!(a.categories, vec!["Dairy & Eggs", "Greek yogurt"]);
        assert!(ClassificationResult::unknown().assignment().is_none());
    }
}
