//! Immutable pronunciation dictionary.

use std::collections::HashMap;

use phonemizer_core::{G2p, SymbolKind};

/// Normalize text into a dictionary key.
pub fn grapheme_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Grapheme key to candidate phoneme sequences, plus the symbol inventory.
///
/// The first candidate of an entry is its primary pronunciation.
#[derive(Debug, Clone, Default)]
pub struct G2pDictionary {
    entries: HashMap<String, Vec<Vec<String>>>,
    symbols: HashMap<String, SymbolKind>,
}

impl G2pDictionary {
    /// Start building a dictionary.
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::default()
    }

    /// All candidate pronunciations for a grapheme, primary first.
    pub fn query_all(&self, grapheme: &str) -> Option<&[Vec<String>]> {
        self.entries.get(&grapheme_key(grapheme)).map(Vec::as_slice)
    }

    /// Classification of a symbol, if it is part of the inventory.
    pub fn symbol_kind(&self, symbol: &str) -> Option<SymbolKind> {
        self.symbols.get(symbol).copied()
    }

    /// Number of grapheme entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of symbols in the inventory.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

impl G2p for G2pDictionary {
    fn is_valid_symbol(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    fn is_vowel(&self, symbol: &str) -> bool {
        self.symbol_kind(symbol).is_some_and(SymbolKind::is_vowel)
    }

    fn is_glide(&self, symbol: &str) -> bool {
        self.symbol_kind(symbol) == Some(SymbolKind::Glide)
    }

    fn query(&self, grapheme: &str) -> Option<Vec<String>> {
        self.query_all(grapheme)
            .and_then(|candidates| candidates.first())
            .cloned()
    }
}

/// Incremental dictionary construction.
///
/// Symbols must be registered before entries: once an inventory exists,
/// entry symbols outside it are dropped.
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    entries: HashMap<String, Vec<Vec<String>>>,
    symbols: HashMap<String, SymbolKind>,
}

impl DictionaryBuilder {
    /// Register a symbol with its classification.
    pub fn add_symbol(mut self, symbol: impl Into<String>, kind: SymbolKind) -> Self {
        self.symbols.insert(symbol.into(), kind);
        self
    }

    /// Register a symbol by its type name (`vowel`, `semivowel`, `stop`, ...).
    pub fn add_symbol_type(self, symbol: impl Into<String>, type_name: &str) -> Self {
        self.add_symbol(symbol, SymbolKind::from_type_name(type_name))
    }

    /// Add a pronunciation for a grapheme.
    ///
    /// A grapheme seen before gains an alternate candidate. Sequences left
    /// empty after symbol filtering are not recorded.
    pub fn add_entry<I, S>(mut self, grapheme: &str, phonemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filter = !self.symbols.is_empty();
        let phonemes: Vec<String> = phonemes
            .into_iter()
            .map(Into::into)
            .filter(|p| !filter || self.symbols.contains_key(p))
            .collect();
        if phonemes.is_empty() {
            return self;
        }
        self.entries
            .entry(grapheme_key(grapheme))
            .or_default()
            .push(phonemes);
        self
    }

    /// Whether a symbol is registered.
    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    /// Finish building.
    pub fn build(self) -> G2pDictionary {
        G2pDictionary {
            entries: self.entries,
            symbols: self.symbols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> G2pDictionary {
        G2pDictionary::builder()
            .add_symbol("a", SymbolKind::Vowel)
            .add_symbol("k", SymbolKind::Consonant)
            .add_symbol_type("j", "semivowel")
            .add_entry("ka", ["k", "a"])
            .add_entry("Kaja", ["k", "a", "j", "a"])
            .add_entry("ka", ["a"])
            .build()
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let dict = sample();
        assert_eq!(dict.query("KA"), Some(vec!["k".to_string(), "a".to_string()]));
        assert_eq!(dict.query(" kaja ").map(|p| p.len()), Some(4));
        assert!(dict.query("ki").is_none());
    }

    #[test]
    fn test_repeated_key_adds_alternate() {
        let dict = sample();
        let candidates = dict.query_all("ka").unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1], vec!["a".to_string()]);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_symbol_classification() {
        let dict = sample();
        assert!(dict.is_vowel("a"));
        assert!(!dict.is_vowel("k"));
        assert!(dict.is_glide("j"));
        assert!(!dict.is_valid_symbol("x"));
        assert_eq!(dict.symbol_count(), 3);
    }

    #[test]
    fn test_unknown_symbols_are_filtered() {
        let dict = G2pDictionary::builder()
            .add_symbol("a", SymbolKind::Vowel)
            .add_entry("xa", ["x", "a"])
            .add_entry("xx", ["x", "x"])
            .build();
        assert_eq!(dict.query("xa"), Some(vec!["a".to_string()]));
        assert!(dict.query("xx").is_none());
    }

    #[test]
    fn test_unpack_hint_keeps_known_symbols() {
        let dict = sample();
        assert_eq!(dict.unpack_hint("k  a x"), vec!["k", "a"]);
    }
}
