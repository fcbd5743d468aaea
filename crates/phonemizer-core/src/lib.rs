//! # phonemizer-core
//!
//! Core types, traits, and error definitions for the lyric phonemizer.
//!
//! This crate provides the foundational abstractions used across all other crates
//! in the workspace, including:
//!
//! - Common data types (`Note`, `PhonemeAttributes`, `Phoneme`, `SymbolKind`, etc.)
//! - The `G2p` and `Voicebank` seams between the pipeline and its collaborators
//! - Unified error handling via `PhonemizerError`
//! - Configuration structures
//! - An in-memory sample table (`MemoryVoicebank`) for tools and tests

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod voicebank;

pub use config::{LoggingConfig, NeuralConfig, PhonemizerConfig, TimingConfig};
pub use error::{PhonemizerError, PhonemizerResult};
pub use traits::{G2p, Voicebank};
pub use types::{Note, Phoneme, PhonemeAttributes, PhonemizerOutput, SymbolKind, TimeAxis};
pub use voicebank::{MemoryVoicebank, Subbank};
