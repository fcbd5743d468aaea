//! Process-wide language assets.
//!
//! Dictionaries and neural packs are loaded once per language and directory
//! set, on first use, and shared by every phonemizer instance. Concurrent
//! first use blocks on a single load.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use g2p_dictionary::layers::{layer_path, load_builtin_layer, load_layer};
use g2p_dictionary::{G2pDictionary, G2pRemapper, LayerLoad, LayerSource};
use g2p_neural::G2pPack;
use once_cell::sync::{Lazy, OnceCell};
use phonemizer_core::{G2p, PhonemizerConfig, SymbolKind};
use syllable_engine::LanguageSpec;
use tracing::{debug, error, info, instrument};

static REGISTRY: Lazy<LanguageRegistry> = Lazy::new(LanguageRegistry::new);

/// Shared G2P assets of one language.
pub struct LanguageAssets {
    pub language: Arc<LanguageSpec>,
    /// `<plugin_dir>/<id>.yaml`.
    pub plugin: LayerLoad,
    /// `<dictionaries_dir>/<dictionary>`.
    pub builtin: LayerLoad,
    /// `<models_dir>/<id>/`, when present and enabled.
    pub pack: Option<G2pPack>,
}

impl LanguageAssets {
    /// Load every asset the configuration points at. Never fails; broken
    /// assets are logged and left out.
    #[instrument(skip_all, fields(language = %language.id))]
    pub fn load(language: Arc<LanguageSpec>, config: &PhonemizerConfig) -> Self {
        let plugin = match &config.plugin_dir {
            Some(dir) => load_layer(LayerSource::Plugin, &layer_path(dir, &language.id)),
            None => LayerLoad::Absent,
        };

        let builtin = match (&config.dictionaries_dir, &language.dictionary) {
            (Some(dir), Some(name)) => {
                let builder = language
                    .symbol_kinds()
                    .into_iter()
                    .fold(G2pDictionary::builder(), |b, (symbol, kind)| {
                        b.add_symbol(symbol, kind)
                    });
                load_builtin_layer(&dir.join(name), builder, &language.replacements)
            }
            _ => LayerLoad::Absent,
        };

        let pack = match &config.models_dir {
            Some(dir) if config.neural.enabled => load_pack(&dir.join(&language.id), config),
            _ => None,
        };

        info!(
            plugin = plugin.is_loaded(),
            builtin = builtin.is_loaded(),
            neural = pack.is_some(),
            "Language assets ready"
        );
        Self {
            language,
            plugin,
            builtin,
            pack,
        }
    }

    /// The built-in dictionary, or the pack's when the language has none.
    ///
    /// Pack output is translated into the language's symbols.
    pub fn builtin_g2p(&self) -> Option<Arc<dyn G2p>> {
        if let Some(dict) = self.builtin.dictionary() {
            return Some(dict);
        }
        let pack = self.pack.as_ref()?;
        let dict = pack.dictionary.dictionary()?;
        Some(self.remap(dict))
    }

    /// The neural source, translated into the language's symbols.
    pub fn neural_g2p(&self) -> Option<Arc<dyn G2p>> {
        self.pack.as_ref().map(|pack| self.remap(pack.neural.clone()))
    }

    fn remap(&self, inner: Arc<dyn G2p>) -> Arc<dyn G2p> {
        let symbols: HashMap<String, SymbolKind> =
            self.language.symbol_kinds().into_iter().collect();
        Arc::new(G2pRemapper::new(
            inner,
            symbols,
            self.language.replacements.clone(),
        ))
    }
}

fn load_pack(dir: &Path, config: &PhonemizerConfig) -> Option<G2pPack> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "No G2P pack");
        return None;
    }
    match G2pPack::load(dir, &config.neural) {
        Ok(pack) => Some(pack),
        Err(e) => {
            error!(dir = %dir.display(), error = %e, "G2P pack failed to load");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AssetKey {
    language: String,
    plugin_dir: Option<PathBuf>,
    dictionaries_dir: Option<PathBuf>,
    models_dir: Option<PathBuf>,
    neural: bool,
}

impl AssetKey {
    fn new(language: &LanguageSpec, config: &PhonemizerConfig) -> Self {
        Self {
            language: language.id.clone(),
            plugin_dir: config.plugin_dir.clone(),
            dictionaries_dir: config.dictionaries_dir.clone(),
            models_dir: config.models_dir.clone(),
            neural: config.neural.enabled,
        }
    }
}

/// Memoized [`LanguageAssets`] keyed by language and directories.
#[derive(Default)]
pub struct LanguageRegistry {
    assets: DashMap<AssetKey, Arc<OnceCell<Arc<LanguageAssets>>>>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static LanguageRegistry {
        &REGISTRY
    }

    /// Assets for a language, loading them on first use.
    pub fn get_or_load(
        &self,
        language: Arc<LanguageSpec>,
        config: &PhonemizerConfig,
    ) -> Arc<LanguageAssets> {
        let key = AssetKey::new(&language, config);
        // Clone the cell out so the shard lock is not held while loading
        let cell = self.assets.entry(key).or_default().clone();
        cell.get_or_init(|| Arc::new(LanguageAssets::load(language, config)))
            .clone()
    }

    /// Number of language and directory combinations seen.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Check if nothing was loaded yet.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn spanish() -> Arc<LanguageSpec> {
        Arc::new(LanguageSpec::builtin("es-syl").unwrap())
    }

    #[test]
    fn test_loads_once_per_key() {
        let registry = LanguageRegistry::new();
        let config = PhonemizerConfig::default();
        let a = registry.get_or_load(spanish(), &config);
        let b = registry.get_or_load(spanish(), &config);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
        assert!(a.builtin_g2p().is_none());
        assert!(a.neural_g2p().is_none());
    }

    #[test]
    fn test_concurrent_first_use() {
        let registry = Arc::new(LanguageRegistry::new());
        let config = PhonemizerConfig::default();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let config = config.clone();
                thread::spawn(move || registry.get_or_load(spanish(), &config))
            })
            .collect();
        let loaded: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(loaded.iter().all(|a| Arc::ptr_eq(a, &loaded[0])));
    }

    #[test]
    fn test_directories_are_part_of_the_key() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("es-syl.yaml"),
            "symbols:\n  - {symbol: o, type: vowel}\n  - {symbol: l, type: liquid}\nentries:\n  - {grapheme: hola, phonemes: [o, l, a]}\n",
        )
        .unwrap();

        let registry = LanguageRegistry::new();
        let bare = registry.get_or_load(spanish(), &PhonemizerConfig::default());
        let config = PhonemizerConfig {
            plugin_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let with_plugin = registry.get_or_load(spanish(), &config);

        assert!(!bare.plugin.is_loaded());
        assert!(with_plugin.plugin.is_loaded());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_builtin_stress_digits_and_replacements() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("cmudict_it.txt"),
            ";;; Italian\nCASA  k a1 s a\nBELLO  b EE1 LL OO\n",
        )
        .unwrap();
        let config = PhonemizerConfig {
            dictionaries_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let italian = Arc::new(LanguageSpec::builtin("it-syl").unwrap());
        let assets = LanguageRegistry::new().get_or_load(italian, &config);
        let builtin = assets.builtin_g2p().unwrap();

        assert_eq!(builtin.query("casa").unwrap(), vec!["k", "a", "s", "a"]);
        assert_eq!(builtin.query("bello").unwrap(), vec!["b", "3", "j", "0"]);
    }
}
