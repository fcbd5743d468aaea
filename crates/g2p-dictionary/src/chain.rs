//! G2P fallback chain.
//!
//! Sources are consulted in a fixed priority: plugin dictionary, voicebank
//! dictionary, built-in dictionary, neural predictor. The first source with
//! an answer wins and results are never merged. When no source answers the
//! input itself is returned as a single symbol.

use std::fmt;
use std::sync::Arc;

use phonemizer_core::G2p;
use tracing::{debug, trace};

use crate::layers::LayerSource;

/// Which source produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    /// A dictionary layer.
    Layer(LayerSource),
    /// The neural predictor (possibly from its cache).
    Neural,
    /// No source answered; the input was passed through.
    Passthrough,
}

impl ResolvedBy {
    fn rank(self) -> u8 {
        match self {
            Self::Layer(LayerSource::Plugin) => 0,
            Self::Layer(LayerSource::Voicebank) => 1,
            Self::Layer(LayerSource::Builtin) => 2,
            Self::Neural => 3,
            Self::Passthrough => 4,
        }
    }
}

impl fmt::Display for ResolvedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layer(source) => write!(f, "{source}"),
            Self::Neural => write!(f, "neural"),
            Self::Passthrough => write!(f, "passthrough"),
        }
    }
}

struct Source {
    label: ResolvedBy,
    g2p: Arc<dyn G2p>,
}

/// Ordered composition of G2P sources.
#[derive(Default)]
pub struct G2pChain {
    sources: Vec<Source>,
}

impl G2pChain {
    /// Start building a chain.
    pub fn builder() -> G2pChainBuilder {
        G2pChainBuilder::default()
    }

    /// Resolve text to phonemes. Never fails.
    pub fn resolve(&self, text: &str) -> Vec<String> {
        self.resolve_traced(text).1
    }

    /// Resolve text and report which source answered.
    pub fn resolve_traced(&self, text: &str) -> (ResolvedBy, Vec<String>) {
        for source in &self.sources {
            if let Some(phonemes) = source.g2p.query(text).filter(|p| !p.is_empty()) {
                trace!(text, by = %source.label, "G2P resolved");
                return (source.label, phonemes);
            }
        }
        debug!(text, "No G2P source answered, passing lyric through");
        (ResolvedBy::Passthrough, vec![text.to_string()])
    }

    /// Labels of the configured sources, in consultation order.
    pub fn sources(&self) -> Vec<ResolvedBy> {
        self.sources.iter().map(|s| s.label).collect()
    }

    /// Number of configured sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if no source is configured.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    fn classify(&self, symbol: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.g2p.is_valid_symbol(symbol))
    }
}

impl G2p for G2pChain {
    fn is_valid_symbol(&self, symbol: &str) -> bool {
        self.classify(symbol).is_some()
    }

    fn is_vowel(&self, symbol: &str) -> bool {
        self.classify(symbol).is_some_and(|s| s.g2p.is_vowel(symbol))
    }

    fn is_glide(&self, symbol: &str) -> bool {
        self.classify(symbol).is_some_and(|s| s.g2p.is_glide(symbol))
    }

    /// First source's answer, without the passthrough.
    fn query(&self, grapheme: &str) -> Option<Vec<String>> {
        match self.resolve_traced(grapheme) {
            (ResolvedBy::Passthrough, _) => None,
            (_, phonemes) => Some(phonemes),
        }
    }
}

/// Builder for [`G2pChain`].
///
/// Sources may be added in any order; the chain always consults them by
/// priority. Sources of equal priority keep insertion order.
#[derive(Default)]
pub struct G2pChainBuilder {
    sources: Vec<Source>,
}

impl G2pChainBuilder {
    /// Add a dictionary layer.
    pub fn layer(mut self, source: LayerSource, g2p: Arc<dyn G2p>) -> Self {
        self.sources.push(Source {
            label: ResolvedBy::Layer(source),
            g2p,
        });
        self
    }

    /// Add a dictionary layer if present.
    pub fn maybe_layer(self, source: LayerSource, g2p: Option<Arc<dyn G2p>>) -> Self {
        match g2p {
            Some(g2p) => self.layer(source, g2p),
            None => self,
        }
    }

    /// Add the neural predictor.
    pub fn neural(mut self, g2p: Arc<dyn G2p>) -> Self {
        self.sources.push(Source {
            label: ResolvedBy::Neural,
            g2p,
        });
        self
    }

    /// Finish building.
    pub fn build(mut self) -> G2pChain {
        self.sources.sort_by_key(|s| s.label.rank());
        G2pChain {
            sources: self.sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::G2pDictionary;

    fn dict(entries: &[(&str, &[&str])]) -> Arc<dyn G2p> {
        let mut builder = G2pDictionary::builder()
            .add_symbol_type("a", "vowel")
            .add_symbol_type("o", "vowel")
            .add_symbol_type("k", "stop")
            .add_symbol_type("t", "stop");
        for (grapheme, phonemes) in entries {
            builder = builder.add_entry(grapheme, phonemes.iter().copied());
        }
        Arc::new(builder.build())
    }

    #[test]
    fn test_higher_layer_wins() {
        let chain = G2pChain::builder()
            .layer(LayerSource::Builtin, dict(&[("ka", &["k", "o"])]))
            .layer(LayerSource::Plugin, dict(&[("ka", &["k", "a"])]))
            .build();
        let (by, phonemes) = chain.resolve_traced("ka");
        assert_eq!(by, ResolvedBy::Layer(LayerSource::Plugin));
        assert_eq!(phonemes, vec!["k", "a"]);
    }

    #[test]
    fn test_falls_through_to_lower_layer() {
        let chain = G2pChain::builder()
            .layer(LayerSource::Plugin, dict(&[("ka", &["k", "a"])]))
            .neural(dict(&[("to", &["k", "k"]), ("ta", &["t", "a"])]))
            .layer(LayerSource::Builtin, dict(&[("to", &["t", "o"])]))
            .build();
        assert_eq!(chain.resolve_traced("to").0, ResolvedBy::Layer(LayerSource::Builtin));
        assert_eq!(chain.resolve("to"), vec!["t", "o"]);
        assert_eq!(chain.resolve_traced("ta").0, ResolvedBy::Neural);
        assert_eq!(
            chain.sources(),
            vec![
                ResolvedBy::Layer(LayerSource::Plugin),
                ResolvedBy::Layer(LayerSource::Builtin),
                ResolvedBy::Neural
            ]
        );
    }

    #[test]
    fn test_passthrough_when_nothing_answers() {
        let chain = G2pChain::builder()
            .layer(LayerSource::Plugin, dict(&[]))
            .build();
        assert_eq!(chain.resolve_traced("xyz"), (ResolvedBy::Passthrough, vec!["xyz".to_string()]));
        assert!(chain.query("xyz").is_none());
        assert_eq!(G2pChain::default().resolve("la"), vec!["la"]);
    }

    #[test]
    fn test_classification_follows_priority() {
        let chain = G2pChain::builder()
            .layer(LayerSource::Plugin, dict(&[]))
            .build();
        assert!(chain.is_vowel("a"));
        assert!(!chain.is_vowel("k"));
        assert!(!chain.is_valid_symbol("zz"));
    }
}
