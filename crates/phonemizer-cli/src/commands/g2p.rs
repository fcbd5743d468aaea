//! G2P command implementation.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use phonemizer_core::PhonemizerConfig;
use runtime::{SyllablePhonemizer, lyric_words};
use syllable_engine::LanguageSpec;

use super::load_voicebank;

/// Run the g2p command.
pub fn run(
    words: &[String],
    language: LanguageSpec,
    config: PhonemizerConfig,
    voicebank: Option<&Path>,
) -> Result<()> {
    let phonemizer = SyllablePhonemizer::new(language, config);
    if let Some(path) = voicebank {
        phonemizer.set_singer(Some(Arc::new(load_voicebank(path)?)));
    }
    let chain = phonemizer.chain();

    println!("Language: {}", phonemizer.language().id);
    println!("Sources:  {:?}", chain.sources());
    println!();
    for word in words.iter().flat_map(|w| lyric_words(w)) {
        let (source, phonemes) = chain.resolve_traced(&word);
        println!("{word:<16} {:<12} {}", source.to_string(), phonemes.join(" "));
    }

    Ok(())
}
