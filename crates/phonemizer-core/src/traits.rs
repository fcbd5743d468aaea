//! Trait definitions for phonemizer pipeline components.

use std::path::Path;

/// Grapheme-to-phoneme source.
///
/// Implementations map a normalized grapheme key to a phoneme sequence and
/// classify the symbols they produce.
pub trait G2p: Send + Sync {
    /// Whether the symbol belongs to this source's inventory.
    fn is_valid_symbol(&self, symbol: &str) -> bool;

    /// Whether the symbol is a vowel.
    fn is_vowel(&self, symbol: &str) -> bool;

    /// Whether the symbol is a glide (semivowel or liquid).
    fn is_glide(&self, symbol: &str) -> bool;

    /// Look up the primary phoneme sequence for a grapheme.
    ///
    /// # Returns
    /// `None` when this source has no answer for the key.
    fn query(&self, grapheme: &str) -> Option<Vec<String>>;

    /// Split a hint string into the symbols this source recognises.
    fn unpack_hint(&self, hint: &str) -> Vec<String> {
        hint.split_whitespace()
            .filter(|s| self.is_valid_symbol(s))
            .map(str::to_string)
            .collect()
    }
}

/// Read-only view of a voicebank's sample table.
///
/// Implementations own tone mapping (prefix maps, nearest tone) and voice
/// color subbanks; the phonemizer only asks questions.
pub trait Voicebank: Send + Sync {
    /// Map an alias at a tone and color to the concrete alias recorded.
    ///
    /// # Returns
    /// `None` if no sample answers for this alias.
    fn try_get_mapped(&self, alias: &str, tone: i32, color: Option<&str>) -> Option<String>;

    /// Whether any sample answers for this alias at this tone.
    fn has(&self, alias: &str, tone: i32) -> bool {
        self.try_get_mapped(alias, tone, None).is_some()
    }

    /// Directory holding the voicebank, used to find local dictionaries.
    fn location(&self) -> Option<&Path> {
        None
    }

    /// Tone sets of the voicebank's subbanks.
    ///
    /// An empty list means a single subbank covering every tone.
    fn subbank_tone_sets(&self) -> Vec<Vec<i32>> {
        Vec::new()
    }

    /// Whether two tones are rendered from the same subbank.
    fn same_subbank(&self, tone1: i32, tone2: i32) -> bool {
        if tone1 == tone2 {
            return true;
        }
        let sets = self.subbank_tone_sets();
        if sets.len() <= 1 {
            return true;
        }
        for set in &sets {
            let has1 = set.contains(&tone1);
            let has2 = set.contains(&tone2);
            if has1 && has2 {
                return true;
            }
            if has1 != has2 {
                return false;
            }
        }
        true
    }
}
