use grocer_core::classifier::FALLBACK_CONFIDENCE;
use grocer_core::embeddings::cosine_similarity;
use grocer_core::matcher::FUZZY_CONFIDENCE;
use grocer_core::{ClassificationResult, ClassifierOptions, MatchType, ProductClassifier, Taxonomy};
use providers::hashing::HashingProvider;
use providers::{EmbedResponse, EmbeddingProvider, ProviderError};
use std::collections::HashMap;
use std::sync::Arc;

async fn builtin() -> ProductClassifier {
    ProductClassifier::build(
        Taxonomy::builtin(),
        Arc::new(HashingProvider::new(256)),
        None,
        ClassifierOptions::default(),
    )
    .await
    .unwrap()
}

/// Fixed 2-d vectors per text; anything else embeds to the zero vector.
/// Lengths are 1 or 5 so cosines are exact in f32.
struct TableProvider(HashMap<&'static str, [f32; 2]>);

#[async_trait::async_trait]
impl EmbeddingProvider for TableProvider {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        Ok(EmbedResponse {
            vectors: texts
                .iter()
                .map(|t| self.0.get(t.as_str()).copied().unwrap_or([0.0, 0.0]).to_vec())
                .collect(),
        })
    }

    fn model_id(&self) -> String {
        "table".into()
    }
}

#[tokio::test]
async fn classify_is_deterministic() {
    let c = builtin().await;
    for name in ["Pams Low Fat Milk 2L", "Fresh Strawberry Yoghurt", "Qwzx Thing", ""] {
        let first = c.classify(name).await.unwrap();
        let second = c.classify(name).await.unwrap();
        assert_eq!(first, second, "{name}");
    }
}

#[tokio::test]
async fn exact_specific_word_wins_with_full_confidence() {
    let c = builtin().await;
    let r = c.classify("Pams Low Fat Milk 2L").await.unwrap();
    assert_eq!(r.category, "Dairy & Eggs");
    assert_eq!(r.matched_word, "milk");
    assert_eq!(r.match_type, MatchType::ExactSpecificWord);
    assert_eq!(r.confidence, 1.0);

    let r = c.classify("Pams Strawberries").await.unwrap();
    assert_eq!(r.category, "Fruits & Vegetables");
    assert_eq!(r.matched_word, "strawberries");
    assert_eq!(r.match_type, MatchType::ExactSpecificWord);
}

#[tokio::test]
async fn plural_forms_resolve_like_their_keyword() {
    let taxonomy = Taxonomy::from_pairs(&[
        ("Vegetables", &["onion", "leaf"]),
        ("Fruit", &["cherry"]),
    ])
    .unwrap();
    let c = ProductClassifier::build(
        taxonomy,
        Arc::new(HashingProvider::new(64)),
        None,
        ClassifierOptions::default(),
    )
    .await
    .unwrap();

    for (word, category) in [
        ("Onion", "Vegetables"),
        ("Onions", "Vegetables"),
        ("Cherry", "Fruit"),
        ("Cherrys", "Fruit"),
        ("Cherries", "Fruit"),
        ("Leaf", "Vegetables"),
        ("Leaves", "Vegetables"),
    ] {
        let name = format!("Acme {}", word);
        let r = c.classify(&name).await.unwrap();
        assert_eq!(r.category, category, "{name}");
        assert_eq!(r.match_type, MatchType::ExactSpecificWord, "{name}");
        assert_eq!(r.matched_word, word.to_lowercase());
    }
}

#[tokio::test]
async fn trailing_cut_word_is_skipped() {
    let c = builtin().await;
    let r = c.classify("Avocado Half").await.unwrap();
    assert_eq!(r.category, "Fruits & Vegetables");
    assert_eq!(r.matched_word, "avocado");
    assert_eq!(r.match_type, MatchType::ExactSpecificWord);
}

#[tokio::test]
async fn misspelling_falls_back_to_fuzzy_match() {
    let c = builtin().await;
    let r = c.classify("Fresh Strawberry Yoghurt").await.unwrap();
    assert_eq!(r.category, "Dairy & Eggs");
    assert_eq!(r.matched_word, "yogurt");
    assert_eq!(r.match_type, MatchType::LastSpecificWord);
    assert_eq!(r.confidence, FALLBACK_CONFIDENCE);

    let outcome = c.matcher().find_category("yoghurt").await.unwrap();
    assert_eq!(outcome.match_type, MatchType::Fuzzy);
    assert_eq!(outcome.score, FUZZY_CONFIDENCE);
    assert_eq!(outcome.matched_word, "yogurt");
}

#[tokio::test]
async fn all_descriptive_names_keep_their_last_word() {
    let c = builtin().await;
    let r = c.classify("Classic Chocolate").await.unwrap();
    assert_eq!(r.matched_word, "chocolate");
    assert_eq!(r.category, "Snacks & Confectionery");
    assert_eq!(r.match_type, MatchType::ExactSpecificWord);
}

#[tokio::test]
async fn unmatched_names_are_unknown_with_zero_confidence() {
    let options = ClassifierOptions {
        threshold: 0.99,
        ..ClassifierOptions::default()
    };
    let c = ProductClassifier::build(
        Taxonomy::builtin(),
        Arc::new(HashingProvider::new(256)),
        None,
        options,
    )
    .await
    .unwrap();
    for name in ["", "   ", "Pams 500g", "Qwzxv"] {
        let r = c.classify(name).await.unwrap();
        assert_eq!(r, ClassificationResult::unknown(), "{name}");
        assert_eq!(r.confidence, 0.0);
        assert!(r.assignment().is_none());
    }
}

#[tokio::test]
async fn semantic_score_is_the_cosine_similarity() {
    let taxonomy =
        Taxonomy::from_pairs(&[("Dairy", &["milk"]), ("Bakery", &["bread"])]).unwrap();
    let provider = TableProvider(HashMap::from([
        ("milk", [1.0, 0.0]),
        ("bread", [0.0, 1.0]),
        ("latte", [4.0, 3.0]),
        ("crouton", [3.0, 4.0]),
    ]));
    let c = ProductClassifier::build(taxonomy, Arc::new(provider), None, ClassifierOptions::default())
        .await
        .unwrap();

    let outcome = c.matcher().find_category("latte").await.unwrap();
    assert_eq!(outcome.match_type, MatchType::Semantic);
    assert_eq!(outcome.category.as_deref(), Some("Dairy"));
    assert_eq!(outcome.matched_word, "milk");
    assert!((outcome.score - cosine_similarity(&[4.0, 3.0], &[1.0, 0.0])).abs() < 1e-6);

    let r = c.classify("Iced Latte").await.unwrap();
    assert_eq!(r.category, "Dairy");
    assert_eq!(r.matched_word, "milk");
    assert_eq!(r.match_type, MatchType::LastSpecificWord);
    assert_eq!(r.confidence, FALLBACK_CONFIDENCE);

    // 0.8 for bread: above the default threshold.
    let r = c.classify("Crouton").await.unwrap();
    assert_eq!(r.category, "Bakery");

    let strict = ClassifierOptions {
        threshold: 0.8,
        ..ClassifierOptions::default()
    };
    let taxonomy =
        Taxonomy::from_pairs(&[("Dairy", &["milk"]), ("Bakery", &["bread"])]).unwrap();
    let provider = TableProvider(HashMap::from([
        ("milk", [1.0, 0.0]),
        ("bread", [0.0, 1.0]),
        ("latte", [4.0, 3.0]),
    ]));
    let c = ProductClassifier::build(taxonomy, Arc::new(provider), None, strict)
        .await
        .unwrap();
    // Equal to the threshold is not enough.
    assert!(c.classify("Latte").await.unwrap().is_unknown());
}

#[tokio::test]
async fn assignment_labels_follow_matched_word() {
    let c = builtin().await;
    let r = c.classify("Pams Bagels").await.unwrap();
    assert_eq!(r.category, "Bread & Bakery");
    let a = r.assignment().unwrap();
    assert_eq!(a.label, "Bagels");
    assert_eq!(a.categories, vec!["Bread & Bakery".to_string(), "Bagels".to_string()]);
}
