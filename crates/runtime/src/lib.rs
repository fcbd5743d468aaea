//! # runtime
//!
//! Runtime side of the lyric phonemizer.
//!
//! This crate provides:
//! - The host-facing [`SyllablePhonemizer`]
//! - A process-wide, memoized registry of language assets
//! - Alias resolution with fallback substitutes
//! - Alias timing on the tick axis
//! - G2P cache warm-up
//! - Structured logging and metric descriptions

pub mod logging;
pub mod metrics;
pub mod phonemizer;
pub mod registry;
pub mod resolver;
pub mod timing;
pub mod warm;

pub use phonemizer::SyllablePhonemizer;
pub use registry::{LanguageAssets, LanguageRegistry};
pub use resolver::{AliasResolver, Resolution};
pub use timing::Timing;
pub use warm::{lyric_words, warm_g2p_cache};
