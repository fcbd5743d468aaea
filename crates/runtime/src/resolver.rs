//! Alias resolution against the voicebank.

use phonemizer_core::Voicebank;
use syllable_engine::LanguageSpec;
use tracing::{debug, warn};

use crate::metrics;

/// Outcome of resolving one desired alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The voicebank has the alias; holds the mapped sample alias.
    Exact(String),
    /// A substitute was present.
    Substituted { alias: String, from: String },
    /// Nothing present; the desired alias as is.
    Literal(String),
}

impl Resolution {
    /// The alias to render.
    pub fn alias(&self) -> &str {
        match self {
            Self::Exact(alias) | Self::Substituted { alias, .. } | Self::Literal(alias) => alias,
        }
    }

    pub fn into_alias(self) -> String {
        match self {
            Self::Exact(alias) | Self::Substituted { alias, .. } | Self::Literal(alias) => alias,
        }
    }

    /// Whether the voicebank answered.
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }
}

/// Maps desired aliases onto samples, consulting the language's fallbacks.
#[derive(Clone, Copy)]
pub struct AliasResolver<'a> {
    language: &'a LanguageSpec,
    voicebank: Option<&'a dyn Voicebank>,
}

impl<'a> AliasResolver<'a> {
    pub fn new(language: &'a LanguageSpec, voicebank: Option<&'a dyn Voicebank>) -> Self {
        Self {
            language,
            voicebank,
        }
    }

    /// Resolve `desired` at `tone + tone_shift` and a voice color.
    ///
    /// Order: the alias itself, alias substitutes as declared, then phoneme
    /// substitutions. The first present candidate wins.
    pub fn resolve(
        &self,
        desired: &str,
        tone: i32,
        color: Option<&str>,
        tone_shift: i32,
    ) -> Resolution {
        let Some(voicebank) = self.voicebank else {
            return Resolution::Literal(desired.to_string());
        };
        let tone = tone + tone_shift;
        if let Some(mapped) = voicebank.try_get_mapped(desired, tone, color) {
            return Resolution::Exact(mapped);
        }

        for candidate in self.substitutes(desired) {
            if let Some(mapped) = voicebank.try_get_mapped(&candidate, tone, color) {
                debug!(desired, substitute = %candidate, tone, "Alias substituted");
                metrics::alias_fallback();
                return Resolution::Substituted {
                    alias: mapped,
                    from: desired.to_string(),
                };
            }
        }

        warn!(alias = desired, tone, color = ?color, "No sample for alias");
        metrics::alias_miss();
        Resolution::Literal(desired.to_string())
    }

    /// Substitute aliases for `desired`, in the order they are tried.
    pub fn substitutes(&self, desired: &str) -> Vec<String> {
        let fallback = &self.language.fallback;
        let mut candidates: Vec<String> = fallback
            .aliases
            .iter()
            .filter(|f| f.alias == desired)
            .flat_map(|f| f.candidates.iter().cloned())
            .collect();

        if fallback.phonemes.is_empty() {
            return candidates;
        }
        let tokens = self.language.tokenize_alias(desired);
        for rule in &fallback.phonemes {
            if !tokens.contains(&rule.phoneme) {
                continue;
            }
            for substitute in &rule.candidates {
                let candidate: String = tokens
                    .iter()
                    .map(|t| if *t == rule.phoneme { substitute } else { t })
                    .map(String::as_str)
                    .collect();
                if candidate != desired && !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }
}
