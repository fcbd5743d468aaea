//! Syllable rule engine.
//!
//! Maps syllables and endings onto alias slots. The decomposition is chosen
//! by the language's [`DecompositionPolicy`]; presence checks against the
//! voicebank pick between optional variants.

mod cvc;
mod cvvc;

use std::fmt;
use std::sync::Arc;

use phonemizer_core::{TimeAxis, Voicebank};
use tracing::trace;

use crate::language::{DecompositionPolicy, LanguageSpec};
use crate::syllable::{Ending, Syllable};

/// One rule engine output item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasSlot {
    /// Render this alias.
    Alias(String),
    /// Keep the previously rendered alias going.
    Extend,
}

impl AliasSlot {
    pub fn alias(alias: impl Into<String>) -> Self {
        Self::Alias(alias.into())
    }

    /// The alias, if this slot renders one.
    pub fn as_alias(&self) -> Option<&str> {
        match self {
            Self::Alias(alias) => Some(alias),
            Self::Extend => None,
        }
    }
}

impl fmt::Display for AliasSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alias(alias) => f.write_str(alias),
            Self::Extend => f.write_str("<extend>"),
        }
    }
}

/// What the rules may ask about the current render.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    voicebank: Option<&'a dyn Voicebank>,
    time_axis: TimeAxis,
    transition_ms: f64,
}

impl<'a> RuleContext<'a> {
    /// `transition_ms` is the tempo-scaled transition length.
    pub fn new(voicebank: Option<&'a dyn Voicebank>, time_axis: TimeAxis, transition_ms: f64) -> Self {
        Self {
            voicebank,
            time_axis,
            transition_ms,
        }
    }

    /// Whether the voicebank has the alias. False without a voicebank.
    pub fn has(&self, alias: &str, tone: i32) -> bool {
        self.voicebank.is_some_and(|vb| vb.has(alias, tone))
    }

    /// First candidate the voicebank has.
    pub fn first_present(&self, tone: i32, candidates: &[String]) -> Option<String> {
        candidates.iter().find(|c| self.has(c, tone)).cloned()
    }

    /// First candidate the voicebank has, else the first candidate.
    pub fn pick(&self, tone: i32, candidates: &[String]) -> String {
        self.first_present(tone, candidates)
            .or_else(|| candidates.first().cloned())
            .unwrap_or_default()
    }

    /// Whether a container is too short for two transitions.
    pub fn is_short(&self, duration: Option<i32>) -> bool {
        duration.is_some_and(|d| self.time_axis.tick_to_ms(d) < self.transition_ms * 2.0)
    }

    /// Whether two tones render from the same subbank. True without a voicebank.
    pub fn same_subbank(&self, tone1: i32, tone2: i32) -> bool {
        self.voicebank.is_none_or(|vb| vb.same_subbank(tone1, tone2))
    }
}

/// Rule engine for one language.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    language: Arc<LanguageSpec>,
}

impl RuleEngine {
    pub fn new(language: Arc<LanguageSpec>) -> Self {
        Self { language }
    }

    pub fn language(&self) -> &LanguageSpec {
        &self.language
    }

    /// Aliases for one syllable, cluster aliases first, vowel alias last.
    pub fn process(&self, syllable: &Syllable, ctx: &RuleContext<'_>) -> Vec<AliasSlot> {
        let slots = match self.language.policy {
            DecompositionPolicy::Cvc => cvc::process(&self.language, syllable, ctx),
            DecompositionPolicy::Cvvc => cvvc::process(&self.language, syllable, ctx),
        };
        trace!(%syllable, slots = ?slots, "Syllable rules");
        slots
    }

    /// Aliases closing a phrase.
    pub fn process_ending(&self, ending: &Ending, ctx: &RuleContext<'_>) -> Vec<AliasSlot> {
        let slots = match self.language.policy {
            DecompositionPolicy::Cvc => cvc::process_ending(&self.language, ending, ctx),
            DecompositionPolicy::Cvvc => cvvc::process_ending(&self.language, ending, ctx),
        };
        trace!(%ending, slots = ?slots, "Ending rules");
        slots
    }
}

/// Whether a syllable continues the previous vowel's alias.
fn can_extend(language: &LanguageSpec, syllable: &Syllable, ctx: &RuleContext<'_>) -> bool {
    syllable.can_alias_be_extended
        && syllable.cc.is_empty()
        && language.is_continuous(&syllable.prev_v, &syllable.v)
        && ctx.same_subbank(syllable.tone, syllable.vowel_tone)
}

fn starting_v(syllable: &Syllable, ctx: &RuleContext<'_>) -> Vec<AliasSlot> {
    let v = &syllable.v;
    vec![AliasSlot::Alias(
        ctx.pick(syllable.vowel_tone, &[format!("-{v}"), format!("- {v}")]),
    )]
}
