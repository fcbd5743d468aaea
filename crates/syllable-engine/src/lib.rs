//! # syllable-engine
//!
//! Turns phoneme sequences into voicebank aliases.
//!
//! ## Pipeline
//!
//! 1. [`Segmenter`] splits a note group's phonemes into [`Syllable`]s and an
//!    [`Ending`]
//! 2. [`RuleEngine`] maps each of them onto [`AliasSlot`]s following the
//!    language's decomposition policy
//! 3. [`transition_weight`] scales the transition length of each alias
//!
//! Languages are data: a [`LanguageSpec`] record per language, three of them
//! built in.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use phonemizer_core::{MemoryVoicebank, Note, TimeAxis, Voicebank};
//! use syllable_engine::{LanguageSpec, RuleContext, RuleEngine, Segmenter};
//!
//! let language = Arc::new(LanguageSpec::builtin("es-syl")?);
//! let voicebank = MemoryVoicebank::new(["-k", "ka", "a -"]);
//! let ctx = RuleContext::new(Some(&voicebank as &dyn Voicebank), TimeAxis::default(), 100.0);
//!
//! let segmenter = Segmenter::new(&language);
//! let word = segmenter.prepare(vec!["k".into(), "a".into()], &[Note::new("ka", 60, 0, 480)]);
//! let engine = RuleEngine::new(language.clone());
//! for syllable in segmenter.make_syllables(&word, None) {
//!     println!("{:?}", engine.process(&syllable, &ctx));
//! }
//! # Ok::<(), phonemizer_core::PhonemizerError>(())
//! ```

pub mod duration;
pub mod language;
pub mod rules;
pub mod segmenter;
pub mod syllable;

pub use duration::transition_weight;
pub use language::{
    AliasFallback, BareCv, DecompositionPolicy, FallbackSpec, GlidePolicy, LanguageSpec,
    PhonemeFallback,
};
pub use rules::{AliasSlot, RuleContext, RuleEngine};
pub use segmenter::{Segmenter, Word, is_extension_note, split_last_note};
pub use syllable::{Ending, Syllable};
