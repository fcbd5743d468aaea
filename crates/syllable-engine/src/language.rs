//! Per-language configuration records.
//!
//! A language is plain data: symbol classes, dictionary replacements, alias
//! fallbacks and the decomposition policy. The built-in records are YAML
//! resources compiled into the crate.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use phonemizer_core::{PhonemizerError, PhonemizerResult, SymbolKind};
use serde::{Deserialize, Serialize};

/// How a syllable's phonemes are decomposed into aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionPolicy {
    /// `-CV`, `VC`, `C-` style banks.
    Cvc,
    /// `- CV`, `V C`, `CV`, `V -` style banks, with cluster and VCV lookups.
    Cvvc,
}

/// Where a glide goes when it precedes a vowel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlidePolicy {
    /// The glide stays in the consonant cluster.
    #[default]
    Cluster,
    /// The glide joins the vowel when the joined symbol is a vowel.
    Nucleus,
}

/// When a mid-phrase consonant-vowel alias is used without the leading dash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BareCv {
    /// Use bare `CV` after exactly one consonant.
    #[serde(default = "default_true")]
    pub single_consonant: bool,
    /// Use bare `CV` when the preceding note is too short for a transition.
    #[serde(default = "default_true")]
    pub short_note: bool,
    /// Use bare `CV` when the cluster ends with this symbol.
    #[serde(default)]
    pub marker: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for BareCv {
    fn default() -> Self {
        Self {
            single_consonant: true,
            short_note: true,
            marker: None,
        }
    }
}

/// Alias-level fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasFallback {
    pub alias: String,
    pub candidates: Vec<String>,
}

/// Phoneme-level fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonemeFallback {
    pub phoneme: String,
    pub candidates: Vec<String>,
}

/// Ordered substitutes consulted when an alias is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackSpec {
    #[serde(default)]
    pub aliases: Vec<AliasFallback>,
    #[serde(default)]
    pub phonemes: Vec<PhonemeFallback>,
}

/// Language configuration record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSpec {
    /// Registry key, e.g. `ru-cvc`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short tag shown by hosts.
    #[serde(default)]
    pub tag: String,
    /// Decomposition policy.
    pub policy: DecompositionPolicy,
    /// Built-in CMU dictionary file name.
    #[serde(default)]
    pub dictionary: Option<String>,
    pub vowels: Vec<String>,
    pub consonants: Vec<String>,
    /// Consonants classified as glides.
    #[serde(default)]
    pub glides: Vec<String>,
    #[serde(default)]
    pub burst_consonants: Vec<String>,
    /// Consonants whose transitions are shortened.
    #[serde(default)]
    pub short_consonants: Vec<String>,
    /// Consonants whose transitions are lengthened.
    #[serde(default)]
    pub long_consonants: Vec<String>,
    /// Dictionary symbol replacements applied while loading the built-in
    /// dictionary.
    #[serde(default)]
    pub replacements: HashMap<String, String>,
    #[serde(default)]
    pub fallback: FallbackSpec,
    #[serde(default)]
    pub bare_cv: BareCv,
    /// Vowel pairs that may extend the previous alias.
    #[serde(default)]
    pub continuous_vowels: Vec<(String, String)>,
    #[serde(default)]
    pub glide_policy: GlidePolicy,
}

const BUILTIN_SOURCES: &[(&str, &str)] = &[
    ("ru-cvc", include_str!("../resources/languages/ru-cvc.yaml")),
    ("it-syl", include_str!("../resources/languages/it-syl.yaml")),
    ("es-syl", include_str!("../resources/languages/es-syl.yaml")),
];

impl LanguageSpec {
    /// Parse a record from YAML.
    pub fn from_yaml_str(text: &str, origin: &str) -> PhonemizerResult<Self> {
        let spec: Self = serde_yaml::from_str(text)
            .map_err(|e| PhonemizerError::config(format!("{origin}: {e}")))?;
        spec.validate(origin)?;
        Ok(spec)
    }

    /// Load a record from a YAML file.
    pub fn from_file(path: &Path) -> PhonemizerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text, &path.display().to_string())
    }

    /// Ids of the built-in languages.
    pub fn builtin_ids() -> impl Iterator<Item = &'static str> {
        BUILTIN_SOURCES.iter().map(|(id, _)| *id)
    }

    /// A built-in language by id.
    pub fn builtin(id: &str) -> PhonemizerResult<Self> {
        let (_, source) = BUILTIN_SOURCES
            .iter()
            .find(|(builtin, _)| *builtin == id)
            .ok_or_else(|| PhonemizerError::UnknownLanguage(id.to_string()))?;
        Self::from_yaml_str(source, id)
    }

    fn validate(&self, origin: &str) -> PhonemizerResult<()> {
        if self.id.trim().is_empty() {
            return Err(PhonemizerError::config(format!("{origin}: empty language id")));
        }
        if self.vowels.is_empty() {
            return Err(PhonemizerError::config(format!("{origin}: no vowels declared")));
        }
        if let Some(glide) = self.glides.iter().find(|g| !self.consonants.contains(g)) {
            return Err(PhonemizerError::config(format!(
                "{origin}: glide {glide} is not a consonant"
            )));
        }
        Ok(())
    }

    pub fn is_vowel(&self, symbol: &str) -> bool {
        self.vowels.iter().any(|v| v == symbol)
    }

    pub fn is_consonant(&self, symbol: &str) -> bool {
        self.consonants.iter().any(|c| c == symbol)
    }

    pub fn is_glide(&self, symbol: &str) -> bool {
        self.glides.iter().any(|g| g == symbol)
    }

    pub fn is_burst(&self, symbol: &str) -> bool {
        self.burst_consonants.iter().any(|c| c == symbol)
    }

    /// Whether two vowels may share one extended alias.
    pub fn is_continuous(&self, prev_v: &str, v: &str) -> bool {
        prev_v == v
            || self
                .continuous_vowels
                .iter()
                .any(|(a, b)| a == prev_v && b == v)
    }

    /// Full symbol inventory with classes, vowels first.
    pub fn symbol_kinds(&self) -> Vec<(String, SymbolKind)> {
        let vowels = self.vowels.iter().map(|v| (v.clone(), SymbolKind::Vowel));
        let consonants = self.consonants.iter().map(|c| {
            let kind = if self.is_glide(c) {
                SymbolKind::Glide
            } else {
                SymbolKind::Consonant
            };
            (c.clone(), kind)
        });
        vowels.chain(consonants).collect()
    }

    /// Split an alias into inventory symbols, longest match first.
    ///
    /// Characters that start no symbol (separators, dashes, unknown letters)
    /// become single-character tokens.
    pub fn tokenize_alias(&self, alias: &str) -> Vec<String> {
        let inventory: HashSet<&str> = self
            .vowels
            .iter()
            .chain(&self.consonants)
            .map(String::as_str)
            .collect();
        let max_len = inventory.iter().map(|s| s.len()).max().unwrap_or(1);

        let mut tokens = Vec::new();
        let mut rest = alias;
        while let Some(first) = rest.chars().next() {
            let matched = (1..=max_len.min(rest.len()))
                .rev()
                .filter(|&n| rest.is_char_boundary(n))
                .map(|n| &rest[..n])
                .find(|candidate| inventory.contains(candidate));
            let token = matched.unwrap_or(&rest[..first.len_utf8()]);
            tokens.push(token.to_string());
            rest = &rest[token.len()..];
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_parse() {
        for id in LanguageSpec::builtin_ids() {
            let spec = LanguageSpec::builtin(id).unwrap();
            assert_eq!(spec.id, id);
            assert!(!spec.vowels.is_empty());
            assert!(spec.dictionary.is_some());
        }
    }

    #[test]
    fn test_russian_record() {
        let ru = LanguageSpec::builtin("ru-cvc").unwrap();
        assert_eq!(ru.policy, DecompositionPolicy::Cvc);
        assert!(ru.is_vowel("y"));
        assert!(ru.is_consonant("~"));
        assert!(ru.is_glide("~"));
        assert!(ru.is_burst("4'"));
        assert_eq!(ru.replacements.get("ch").map(String::as_str), Some("4'"));
        assert_eq!(ru.bare_cv.marker.as_deref(), Some("`"));
        assert_eq!(ru.fallback.aliases[0].candidates, vec!["yc"]);
    }

    #[test]
    fn test_unknown_builtin() {
        let err = LanguageSpec::builtin("xx-vcv").unwrap_err();
        assert!(matches!(err, PhonemizerError::UnknownLanguage(_)));
    }

    #[test]
    fn test_validation() {
        let err = LanguageSpec::from_yaml_str(
            "id: t\nname: T\npolicy: cvc\nvowels: [a]\nconsonants: [k]\nglides: [w]\n",
            "inline",
        )
        .unwrap_err();
        assert!(err.to_string().contains("glide w"));

        let err = LanguageSpec::from_yaml_str("id: t\nname: T\npolicy: vcv\n", "inline").unwrap_err();
        assert!(matches!(err, PhonemizerError::Config(_)));
    }

    #[test]
    fn test_tokenize_alias_longest_match() {
        let ru = LanguageSpec::builtin("ru-cvc").unwrap();
        assert_eq!(ru.tokenize_alias("k'i-"), vec!["k'", "i", "-"]);
        assert_eq!(ru.tokenize_alias("a 4'"), vec!["a", " ", "4'"]);

        let es = LanguageSpec::builtin("es-syl").unwrap();
        assert_eq!(es.tokenize_alias("- cha"), vec!["-", " ", "ch", "a"]);
        assert_eq!(es.tokenize_alias("rra"), vec!["rr", "a"]);
    }

    #[test]
    fn test_continuous_vowels() {
        let it = LanguageSpec::builtin("it-syl").unwrap();
        assert!(it.is_continuous("a", "a"));
        assert!(it.is_continuous("e", "3"));
        assert!(!it.is_continuous("a", "e"));
        let kinds = it.symbol_kinds();
        assert_eq!(kinds[0], ("a".to_string(), SymbolKind::Vowel));
        assert!(kinds.contains(&("w".to_string(), SymbolKind::Glide)));
    }
}
