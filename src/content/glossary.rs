use std::collections::HashMap;

use crate::content::catalog::{CatalogError, asset_str};

pub const NOT_FOUND: &str = "translation not found";

/// German word → English gloss, used for key-word tooltips.
#[derive(Clone, Debug, Default)]
pub struct Glossary {
    entries: HashMap<String, String>,
}

impl Glossary {
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(&asset_str("glossary.json")?)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Exact-case lookup first (Sie vs sie), then the lowercase form.
    /// One trailing punctuation mark is ignored.
    pub fn lookup(&self, word: &str) -> Option<&str> {
        let clean = word
            .strip_suffix(['.', ',', '!', '?', ';', ':'])
            .unwrap_or(word);
        self.entries
            .get(clean)
            .or_else(|| self.entries.get(&clean.to_lowercase()))
            .map(String::as_str)
    }

    pub fn gloss(&self, word: &str) -> &str {
        self.lookup(word).unwrap_or(NOT_FOUND)
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

    fn glossary() -> Glossary {
        Glossary::from_json(r#"{"Sie": "you (formal)", "sie": "she", "hund": "dog"}"#).unwrap()
    }

    #[test]
    fn test_exact_case_wins() {
        let g = glossary();
        assert_eq!(g.gloss("Sie"), "you (formal)");
        assert_eq!(g.gloss("sie"), "she");
    }

    #[test]
    fn test_lowercase_fallback() {
        assert_eq!(glossary().gloss("Hund"), "dog");
    }

    #[test]
    fn test_trailing_punctuation_stripped() {
        assert_eq!(glossary().gloss("Hund."), "dog");
        assert_eq!(glossary().gloss("sie,"), "she");
    }

    #[test]
    fn test_unknown_word_yields_sentinel() {
        assert_eq!(glossary().gloss("Zeitgeist"), NOT_FOUND);
        assert!(glossary().lookup("Zeitgeist").is_none());
    }

    #[test]
    fn test_bundled_glossary_loads() {
        let g = Glossary::bundled().unwrap();
        assert!(!g.is_empty());
        assert_eq!(g.gloss("Hund"), "dog");
    }
}
