//! # g2p-neural
//!
//! Neural grapheme-to-phoneme prediction for words missing from every
//! dictionary.
//!
//! This crate provides:
//! - Grapheme and phoneme alphabets with reserved control indices
//! - A black-box [`SequenceModel`] seam and its candle implementation
//! - Greedy, length-bounded decoding
//! - A process-lifetime prediction cache
//! - Model pack loading (`phones.txt`, `graphemes.txt`, `dict.txt`,
//!   `g2p.safetensors`)
//!
//! # Example
//!
//! ```ignore
//! use g2p_neural::G2pPack;
//! use phonemizer_core::{G2p, NeuralConfig};
//!
//! let pack = G2pPack::load("models/ru-cvc".as_ref(), &NeuralConfig::default())?;
//! let phonemes = pack.neural.query("абракадабра");
//! ```

pub mod alphabet;
pub mod cache;
pub mod model;
pub mod pack;
pub mod predictor;

pub use alphabet::Alphabet;
pub use cache::PredictionCache;
pub use model::{CandleG2pModel, G2pModelConfig, SequenceModel};
pub use pack::{G2pPack, NeuralG2p};
pub use predictor::Predictor;
