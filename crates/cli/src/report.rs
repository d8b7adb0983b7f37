use grocer_core::pipeline::{BatchItem, BatchSummary};
use grocer_core::{ClassificationResult, ClassifierError, ProductClassifier};
use serde::Serialize;
use serde_json::json;

pub fn outcome_json(
    name: &str,
    outcome: &Result<ClassificationResult, ClassifierError>,
) -> serde_json::Value {
    match outcome {
        Ok(r) => json!({
            "name": name,
            "category": r.category,
            "confidence": r.confidence,
            "matched_word": r.matched_word,
            "match_type": r.match_type,
            "assignment": r.assignment(),
        }),
        Err(e) => json!({
            "name": name,
            "error": e.to_string(),
        }),
    }
}

pub fn outcome_line(name: &str, outcome: &Result<ClassificationResult, ClassifierError>) -> String {
    match outcome {
        Ok(r) => format!(
            "{:<40} {:<26} {:>4.2}  {:<20} {}",
            name, r.category, r.confidence, r.match_type, r.matched_word
        ),
        Err(e) => format!("{:<40} error: {}", name, e),
    }
}

pub fn item_json(item: &BatchItem) -> serde_json::Value {
    outcome_json(&item.name, &item.outcome)
}

pub fn summary_line(summary: &BatchSummary) -> String {
    format!(
        "{} products: {} classified, {} unknown, {} failed",
        summary.total, summary.classified, summary.unknown, summary.failed
    )
}

/// Everything the classifier looked at for one name.
#[derive(Debug, Serialize)]
pub struct Explanation {
    pub name: String,
    pub words: Vec<String>,
    pub specific_words: Vec<String>,
    pub last_word: String,
    pub result: Option<ClassificationResult>,
    pub error: Option<String>,
}

pub async fn explain(classifier: &ProductClassifier, name: &str) -> Explanation {
    let tokenizer = classifier.tokenizer();
    let words = tokenizer.extract_words(name);
    let specific_words = tokenizer.specific_words(&words);
    let (result, error) = match classifier.classify(name).await {
        Ok(r) => (Some(r), None),
        Err(e) => (None, Some(e.to_string())),
    };
    Explanation {
        name: name.to_string(),
        last_word: tokenizer.extract_last_word(name),
        words,
        specific_words,
        result,
        error,
    }
}

pub fn explanation_text(ex: &Explanation) -> String {
    let mut out = String::new();
    out.push_str(&format!("name:           {}\n", ex.name));
    out.push_str(&format!("words:          {}\n", ex.words.join(" ")));
    out.push_str(&format!("specific words: {}\n", ex.specific_words.join(" ")));
    out.push_str(&format!("last word:      {}\n", ex.last_word));
    match (&ex.result, &ex.error) {
        (Some(r), _) => out.push_str(&format!(
            "result:         {} ({:.2}, {} via {:?})\n",
            r.category, r.confidence, r.match_type, r.matched_word
        )),
        (None, Some(e)) => out.push_str(&format!("error:          {}\n", e)),
        (None, None) => {}
    }
    out
}
