//! Neural G2P source and model pack loading.
//!
//! A pack is a directory:
//!
//! ```text
//! <models_dir>/<language>/
//!   phones.txt        `symbol type` per line; phoneme alphabet order
//!   graphemes.txt     one grapheme per line
//!   dict.txt          CMU-format dictionary (optional)
//!   g2p.safetensors   model weights
//!   config.yaml       optional G2pModelConfig
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use candle_core::Device;
use g2p_dictionary::layers::load_builtin_layer;
use g2p_dictionary::{G2pDictionary, LayerLoad};
use metrics::counter;
use phonemizer_core::{G2p, NeuralConfig, PhonemizerError, PhonemizerResult, SymbolKind};
use tracing::{debug, info, instrument, warn};

use crate::alphabet::Alphabet;
use crate::cache::PredictionCache;
use crate::model::{CandleG2pModel, G2pModelConfig, SequenceModel};
use crate::predictor::Predictor;

/// Neural predictor with its cache, usable as a chain source.
pub struct NeuralG2p {
    predictor: Predictor,
    cache: PredictionCache,
    classes: HashMap<String, SymbolKind>,
}

impl NeuralG2p {
    /// Create a source from a predictor and the phoneme classes.
    pub fn new(predictor: Predictor, classes: HashMap<String, SymbolKind>) -> Self {
        Self {
            predictor,
            cache: PredictionCache::new(),
            classes,
        }
    }

    /// Create a source from a model and `(symbol, kind)` phones in alphabet order.
    pub fn from_model(
        model: Arc<dyn SequenceModel>,
        graphemes: Alphabet,
        phones: &[(String, SymbolKind)],
        max_output_len: usize,
    ) -> Self {
        let phonemes = Alphabet::new(phones.iter().map(|(s, _)| s.clone()));
        let predictor =
            Predictor::new(model, graphemes, phonemes).with_max_output_len(max_output_len);
        Self::new(predictor, phones.iter().cloned().collect())
    }

    /// The prediction cache.
    pub fn cache(&self) -> &PredictionCache {
        &self.cache
    }
}

impl G2p for NeuralG2p {
    fn is_valid_symbol(&self, symbol: &str) -> bool {
        self.classes.contains_key(symbol)
    }

    fn is_vowel(&self, symbol: &str) -> bool {
        self.classes.get(symbol).is_some_and(|k| k.is_vowel())
    }

    fn is_glide(&self, symbol: &str) -> bool {
        self.classes.get(symbol) == Some(&SymbolKind::Glide)
    }

    /// Cached prediction, or a fresh one that is cached before returning.
    ///
    /// Empty keys and single punctuation characters have no answer. Model
    /// errors are logged and produce no answer; empty predictions are not
    /// cached.
    fn query(&self, grapheme: &str) -> Option<Vec<String>> {
        if is_unanswerable(grapheme) {
            return None;
        }
        if let Some(hit) = self.cache.get(grapheme) {
            return Some(hit);
        }
        counter!("g2p_inference_total").increment(1);
        match self.predictor.predict(grapheme) {
            Ok(phonemes) if !phonemes.is_empty() => Some(self.cache.insert(grapheme, phonemes)),
            Ok(_) => {
                debug!(grapheme, "Empty prediction");
                None
            }
            Err(e) => {
                warn!(grapheme, error = %e, "G2P inference failed");
                None
            }
        }
    }
}

fn is_unanswerable(grapheme: &str) -> bool {
    let mut chars = grapheme.chars();
    match (chars.next(), chars.next()) {
        (None, _) => true,
        (Some(c), None) => !c.is_alphanumeric(),
        _ => false,
    }
}

/// A loaded model pack.
pub struct G2pPack {
    /// Built-in dictionary from `dict.txt`.
    pub dictionary: LayerLoad,
    /// Neural source.
    pub neural: Arc<NeuralG2p>,
    /// Phone inventory from `phones.txt`, in alphabet order.
    pub phones: Vec<(String, SymbolKind)>,
}

impl G2pPack {
    /// Load a pack directory.
    ///
    /// `phones.txt`, `graphemes.txt` and `g2p.safetensors` are required; a
    /// missing `dict.txt` leaves the dictionary absent.
    #[instrument(skip(config), fields(dir = %dir.display()))]
    pub fn load(dir: &Path, config: &NeuralConfig) -> PhonemizerResult<Self> {
        let phones = parse_phones(&read_asset(&dir.join("phones.txt"))?, "phones.txt")?;
        let graphemes = Alphabet::from_lines(&read_asset(&dir.join("graphemes.txt"))?);

        let config_path = dir.join("config.yaml");
        let model_config: G2pModelConfig = if config_path.is_file() {
            serde_yaml::from_str(&read_asset(&config_path)?)
                .map_err(|e| PhonemizerError::config(format!("{}: {e}", config_path.display())))?
        } else {
            G2pModelConfig::default()
        };
        let max_output_len = model_config
            .max_output_len
            .unwrap_or(config.max_output_len);

        let model = CandleG2pModel::load(&dir.join("g2p.safetensors"), &model_config, &Device::Cpu)?;
        let neural = NeuralG2p::from_model(Arc::new(model), graphemes, &phones, max_output_len);

        let builder = phones
            .iter()
            .fold(G2pDictionary::builder(), |b, (symbol, kind)| {
                b.add_symbol(symbol.clone(), *kind)
            });
        let dictionary = load_builtin_layer(&dir.join("dict.txt"), builder, &HashMap::new());

        info!(
            phones = phones.len(),
            dictionary = dictionary.is_loaded(),
            "G2P pack loaded"
        );
        Ok(Self {
            dictionary,
            neural: Arc::new(neural),
            phones,
        })
    }
}

fn read_asset(path: &Path) -> PhonemizerResult<String> {
    std::fs::read_to_string(path).map_err(|source| PhonemizerError::ModelLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse `symbol type` lines.
pub fn parse_phones(text: &str, origin: &str) -> PhonemizerResult<Vec<(String, SymbolKind)>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(symbol), Some(kind)) => {
                    Ok((symbol.to_string(), SymbolKind::from_type_name(kind)))
                }
                _ => Err(PhonemizerError::dictionary_parse(
                    origin,
                    format!("line {}: expected `symbol type`", number + 1),
                )),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::tests::MockModel;
    use std::sync::atomic::Ordering;

    fn phones() -> Vec<(String, SymbolKind)> {
        parse_phones("k stop\na vowel\nj semivowel\n", "phones.txt").unwrap()
    }

    #[test]
    fn test_second_call_hits_cache() {
        let model = Arc::new(MockModel::default());
        let neural = NeuralG2p::from_model(model.clone(), Alphabet::new(["k", "a", "j"]), &phones(), 48);

        let first = neural.query("kaja").unwrap();
        let calls = model.calls.load(Ordering::SeqCst);
        let second = neural.query("kaja").unwrap();

        assert_eq!(first, vec!["k", "a", "j", "a"]);
        assert_eq!(first, second);
        assert_eq!(model.calls.load(Ordering::SeqCst), calls);
        assert_eq!(neural.cache().len(), 1);
    }

    #[test]
    fn test_unanswerable_keys() {
        let model = Arc::new(MockModel::default());
        let neural = NeuralG2p::from_model(model.clone(), Alphabet::new(["k"]), &phones(), 48);
        assert!(neural.query("").is_none());
        assert!(neural.query(",").is_none());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_prediction_is_not_cached() {
        let neural = NeuralG2p::from_model(
            Arc::new(MockModel::default()),
            Alphabet::new(["k"]),
            &phones(),
            48,
        );
        // `x` encodes as UNK and decodes to nothing
        assert!(neural.query("xx").is_none());
        assert!(neural.cache().is_empty());
    }

    #[test]
    fn test_classes() {
        let neural = NeuralG2p::from_model(
            Arc::new(MockModel::default()),
            Alphabet::new(["k"]),
            &phones(),
            48,
        );
        assert!(neural.is_vowel("a"));
        assert!(neural.is_glide("j"));
        assert!(!neural.is_valid_symbol("x"));
    }

    #[test]
    fn test_parse_phones_rejects_bare_symbol() {
        let err = parse_phones("a vowel\nk\n", "phones.txt").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_missing_pack_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = G2pPack::load(dir.path(), &NeuralConfig::default()).err().unwrap();
        assert!(err.is_load_error());
    }
}
