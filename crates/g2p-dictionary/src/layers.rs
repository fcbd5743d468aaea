//! Dictionary layer discovery.
//!
//! A layer is one dictionary file at a known location. Missing files are
//! not an error; unreadable or malformed files are logged and the layer is
//! dropped.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use phonemizer_core::PhonemizerError;
use tracing::{debug, error};

use crate::dictionary::{DictionaryBuilder, G2pDictionary};
use crate::loader;

/// Where a dictionary layer comes from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerSource {
    /// Dictionary shipped next to the plugin.
    Plugin,
    /// Dictionary inside the active voicebank.
    Voicebank,
    /// The language's built-in dictionary.
    Builtin,
}

impl fmt::Display for LayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plugin => write!(f, "plugin"),
            Self::Voicebank => write!(f, "voicebank"),
            Self::Builtin => write!(f, "builtin"),
        }
    }
}

/// Outcome of loading one layer.
#[derive(Debug)]
pub enum LayerLoad {
    /// The file was found and parsed.
    Loaded(Arc<G2pDictionary>),
    /// No file at the expected location.
    Absent,
    /// The file exists but could not be used.
    Failed(PhonemizerError),
}

impl LayerLoad {
    /// The dictionary, if the layer loaded.
    pub fn dictionary(&self) -> Option<Arc<G2pDictionary>> {
        match self {
            Self::Loaded(dict) => Some(Arc::clone(dict)),
            _ => None,
        }
    }

    /// Check if the layer loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Path of a language's YAML layer inside a directory.
pub fn layer_path(dir: &Path, language: &str) -> PathBuf {
    dir.join(format!("{language}.yaml"))
}

/// Load a YAML or CMU layer file.
pub fn load_layer(source: LayerSource, path: &Path) -> LayerLoad {
    finish(source, path, || loader::load_file(path))
}

/// Load a CMU-format built-in layer against a language's symbol inventory.
pub fn load_builtin_layer(
    path: &Path,
    builder: DictionaryBuilder,
    replacements: &HashMap<String, String>,
) -> LayerLoad {
    finish(LayerSource::Builtin, path, || {
        let text = loader::read_dictionary(path)?;
        let origin = path.display().to_string();
        Ok(loader::parse_cmudict(&text, &origin, builder, replacements)?.build())
    })
}

fn finish(
    source: LayerSource,
    path: &Path,
    load: impl FnOnce() -> Result<G2pDictionary, PhonemizerError>,
) -> LayerLoad {
    if !path.is_file() {
        debug!(%source, path = %path.display(), "Dictionary layer absent");
        return LayerLoad::Absent;
    }
    match load() {
        Ok(dict) => {
            debug!(%source, path = %path.display(), entries = dict.len(), "Dictionary layer loaded");
            LayerLoad::Loaded(Arc::new(dict))
        }
        Err(e) => {
            error!(%source, path = %path.display(), error = %e, "Dictionary layer failed to load");
            LayerLoad::Failed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonemizer_core::G2p;

    #[test]
    fn test_absent_layer() {
        let dir = tempfile::tempdir().unwrap();
        let load = load_layer(LayerSource::Plugin, &layer_path(dir.path(), "ru-cvc"));
        assert!(matches!(load, LayerLoad::Absent));
        assert!(load.dictionary().is_none());
    }

    #[test]
    fn test_failed_layer_keeps_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = layer_path(dir.path(), "ru-cvc");
        std::fs::write(&path, "entries: {not: a list}").unwrap();
        match load_layer(LayerSource::Voicebank, &path) {
            LayerLoad::Failed(e) => assert!(e.is_load_error()),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_builtin_layer_uses_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmudict_ru.txt");
        std::fs::write(&path, "мама  m a m a\n").unwrap();
        let builder = G2pDictionary::builder()
            .add_symbol_type("a", "vowel")
            .add_symbol_type("m", "nasal");

        let load = load_builtin_layer(&path, builder, &HashMap::new());
        assert!(load.is_loaded());
        let dict = load.dictionary().unwrap();
        assert!(dict.is_vowel("a"));
        assert_eq!(dict.query("мама").map(|p| p.len()), Some(4));
    }

    #[test]
    fn test_source_order() {
        assert!(LayerSource::Plugin < LayerSource::Voicebank);
        assert!(LayerSource::Voicebank < LayerSource::Builtin);
        assert_eq!(LayerSource::Builtin.to_string(), "builtin");
    }
}
