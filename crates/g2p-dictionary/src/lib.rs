//! # g2p-dictionary
//!
//! Exact-match grapheme-to-phoneme lookup for the lyric phonemizer.
//!
//! This crate provides:
//! - An immutable pronunciation dictionary with symbol classification
//! - Loaders for YAML dictionaries and CMU-style text dictionaries
//! - Layer discovery (plugin, voicebank, built-in) with explicit load outcomes
//! - A remapper translating another source's symbols into a language's set
//! - The fallback chain that composes all sources with a passthrough answer
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use g2p_dictionary::{G2pChain, LayerSource, loader};
//!
//! let plugin = loader::load_file(Path::new("plugins/ru-cvc.yaml"))?;
//! let chain = G2pChain::builder()
//!     .layer(LayerSource::Plugin, std::sync::Arc::new(plugin))
//!     .build();
//! let phonemes = chain.resolve("мама");
//! ```

pub mod chain;
pub mod dictionary;
pub mod layers;
pub mod loader;
pub mod remap;

pub use chain::{G2pChain, G2pChainBuilder, ResolvedBy};
pub use dictionary::{DictionaryBuilder, G2pDictionary, grapheme_key};
pub use layers::{LayerLoad, LayerSource};
pub use remap::G2pRemapper;
