//! Per-alias transition weighting.

use crate::language::LanguageSpec;

/// Transition length multiplier for an alias.
///
/// Aliases ending in a short consonant get 0.75, a long consonant 1.5.
pub fn transition_weight(language: &LanguageSpec, alias: &str) -> f64 {
    if language.short_consonants.iter().any(|c| alias.ends_with(c.as_str())) {
        0.75
    } else if language.long_consonants.iter().any(|c| alias.ends_with(c.as_str())) {
        1.5
    } else {
        1.0
    }
}
