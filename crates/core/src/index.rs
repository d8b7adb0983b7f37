//! Exact-match table from keyword (and its plural forms) to category.

use crate::taxonomy::Taxonomy;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    entries: BTreeMap<String, String>,
}

/// Forms registered for a normalized keyword, in registration order: the
/// keyword, its naive plural, and a `y→ies` or `f→ves` form when applicable.
pub fn variants(keyword: &str) -> Vec<String> {
    let mut forms = vec![keyword.to_string(), format!("{}s", keyword)];
    if let Some(stem) = keyword.strip_suffix('y') {
        forms.push(format!("{}ies", stem));
    } else if let Some(stem) = keyword.strip_suffix('f') {
        forms.push(format!("{}ves", stem));
    }
    forms
}

impl LookupIndex {
    /// Later registrations overwrite earlier ones for the same string.
    pub fn build(taxonomy: &Taxonomy) -> Self {
        let mut entries = BTreeMap::new();
        let mut overwritten = 0usize;
        for (category, keyword) in taxonomy.entries() {
            for form in variants(&keyword) {
                if let Some(prev) = entries.insert(form, category.to_string()) {
                    if prev != category {
                        overwritten += 1;
                    }
                }
            }
        }
        debug!(
            "lookup index: {} keys, {} cross-category overwrites",
            entries.len(),
            overwritten
        );
        Self { entries }
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    /// All registered strings in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_forms() {
        assert_eq!(variants("milk"), vec!["milk", "milks"]);
        assert_eq!(
            variants("strawberry"),
            vec!["strawberry", "strawberrys", "strawberries"]
        );
        assert_eq!(variants("loaf"), vec!["loaf", "loafs", "loaves"]);
    }

    #[test]
    fn registers_keywords_lowercased_with_variants() {
        let tax = Taxonomy::from_pairs(&[("Dairy", &["Greek Yogurt", "milk"])]).unwrap();
        let index = LookupIndex::build(&tax);
        assert_eq!(index.get("greek yogurt"), Some("Dairy"));
        assert_eq!(index.get("milks"), Some("Dairy"));
        assert_eq!(index.get("Greek Yogurt"), None);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn last_registration_wins_on_collision() {
        let tax = Taxonomy::from_pairs(&[
            ("Pantry Items", &["sauce", "pea"]),
            ("Canned & Packaged Foods", &["sauce", "peas"]),
        ])
        .unwrap();
        let index = LookupIndex::build(&tax);
        assert_eq!(index.get("sauce"), Some("Canned & Packaged Foods"));
        // "peas" was first registered as the plural of "pea"
        assert_eq!(index.get("peas"), Some("Canned & Packaged Foods"));
        assert_eq!(index.get("pea"), Some("Pantry Items"));
    }

    #[test]
    fn builtin_collisions_resolve_to_later_category() {
        let index = LookupIndex::build(&Taxonomy::builtin());
        assert_eq!(index.get("mix"), Some("Miscellaneous"));
        assert_eq!(index.get("strawberries"), Some("Fruits & Vegetables"));
        assert_eq!(index.get("loaves"), Some("Bread & Bakery"));
    }
}
