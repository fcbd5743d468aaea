//! CLI command implementations.

pub mod g2p;
pub mod languages;
pub mod phonemize;

use std::path::Path;

use anyhow::{Context, Result};
use phonemizer_core::{MemoryVoicebank, PhonemizerConfig};
use syllable_engine::LanguageSpec;

/// Read the configuration file, or the defaults without one.
pub fn load_config(path: Option<&Path>) -> Result<PhonemizerConfig> {
    match path {
        Some(path) => PhonemizerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PhonemizerConfig::default()),
    }
}

/// A language record from a file, or a built-in one by id.
pub fn load_language(id: &str, file: Option<&Path>) -> Result<LanguageSpec> {
    match file {
        Some(path) => LanguageSpec::from_file(path)
            .with_context(|| format!("failed to load language {}", path.display())),
        None => LanguageSpec::builtin(id).with_context(|| format!("unknown language: {id}")),
    }
}

/// Load a voicebank alias list.
pub fn load_voicebank(path: &Path) -> Result<MemoryVoicebank> {
    MemoryVoicebank::from_alias_file(path)
        .with_context(|| format!("failed to load voicebank {}", path.display()))
}
