//! Symbol remapping between G2P sources.

use std::collections::HashMap;
use std::sync::Arc;

use phonemizer_core::{G2p, SymbolKind};

/// Wraps a G2P source and translates its output into another symbol set.
///
/// Classification questions are answered from the target inventory.
pub struct G2pRemapper {
    inner: Arc<dyn G2p>,
    symbols: HashMap<String, SymbolKind>,
    replacements: HashMap<String, String>,
}

impl G2pRemapper {
    /// Create a remapper over `inner`.
    pub fn new(
        inner: Arc<dyn G2p>,
        symbols: HashMap<String, SymbolKind>,
        replacements: HashMap<String, String>,
    ) -> Self {
        Self {
            inner,
            symbols,
            replacements,
        }
    }
}

impl G2p for G2pRemapper {
    fn is_valid_symbol(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    fn is_vowel(&self, symbol: &str) -> bool {
        self.symbols.get(symbol).is_some_and(|k| k.is_vowel())
    }

    fn is_glide(&self, symbol: &str) -> bool {
        self.symbols.get(symbol) == Some(&SymbolKind::Glide)
    }

    fn query(&self, grapheme: &str) -> Option<Vec<String>> {
        let phonemes = self.inner.query(grapheme)?;
        Some(
            phonemes
                .into_iter()
                .map(|p| self.replacements.get(&p).cloned().unwrap_or(p))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::G2pDictionary;

    #[test]
    fn test_remaps_output_and_classifies_by_target() {
        let inner = G2pDictionary::builder()
            .add_entry("ja", ["y", "aa"])
            .build();
        let symbols = HashMap::from([
            ("j".to_string(), SymbolKind::Glide),
            ("a".to_string(), SymbolKind::Vowel),
        ]);
        let replacements = HashMap::from([
            ("y".to_string(), "j".to_string()),
            ("aa".to_string(), "a".to_string()),
        ]);
        let remapper = G2pRemapper::new(Arc::new(inner), symbols, replacements);

        assert_eq!(remapper.query("ja"), Some(vec!["j".to_string(), "a".to_string()]));
        assert!(remapper.is_glide("j"));
        assert!(remapper.is_vowel("a"));
        assert!(!remapper.is_valid_symbol("aa"));
        assert!(remapper.query("xx").is_none());
    }
}
