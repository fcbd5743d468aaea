//! Core data types for the phonemizer pipeline.

use serde::{Deserialize, Serialize};

/// Classification of a phoneme symbol within one language's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Stretchable nucleus of a syllable.
    Vowel,
    /// Non-stretchable symbol.
    Consonant,
    /// Semivowel or liquid; never a vowel.
    Glide,
}

impl SymbolKind {
    /// Parse the `type` column used by dictionary and phone-set files.
    ///
    /// Anything that is not a vowel, semivowel or liquid is a consonant.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "vowel" => Self::Vowel,
            "semivowel" | "liquid" => Self::Glide,
            _ => Self::Consonant,
        }
    }

    /// Whether this symbol is a vowel.
    pub fn is_vowel(self) -> bool {
        self == Self::Vowel
    }
}

/// Per-index attributes a user attached to the phonemes of a note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonemeAttributes {
    /// Index of the phoneme inside the note's output.
    pub index: usize,
    /// Voice color tag selecting a subbank.
    #[serde(default)]
    pub voice_color: Option<String>,
    /// Tone shift applied on top of the note tone.
    #[serde(default)]
    pub tone_shift: i32,
    /// Alternate sample index.
    #[serde(default)]
    pub alternate: Option<i32>,
}

impl PhonemeAttributes {
    /// Create attributes for the phoneme at `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Set the voice color.
    pub fn with_voice_color(mut self, color: impl Into<String>) -> Self {
        self.voice_color = Some(color.into());
        self
    }

    /// Set the tone shift.
    pub fn with_tone_shift(mut self, tone_shift: i32) -> Self {
        self.tone_shift = tone_shift;
        self
    }
}

/// A note as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Lyric text, without any bracketed hint.
    pub lyric: String,
    /// Explicit phonetic override.
    #[serde(default)]
    pub phonetic_hint: Option<String>,
    /// Music tone, C4 = 60.
    pub tone: i32,
    /// Position in ticks.
    pub position: i32,
    /// Duration in ticks.
    pub duration: i32,
    /// Per-index phoneme attributes.
    #[serde(default)]
    pub phoneme_attributes: Vec<PhonemeAttributes>,
}

impl Note {
    /// Create a note without hint or attributes.
    pub fn new(lyric: impl Into<String>, tone: i32, position: i32, duration: i32) -> Self {
        Self {
            lyric: lyric.into(),
            phonetic_hint: None,
            tone,
            position,
            duration,
            phoneme_attributes: Vec::new(),
        }
    }

    /// Set the phonetic hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.phonetic_hint = Some(hint.into());
        self
    }

    /// Attach phoneme attributes.
    pub fn with_attributes(mut self, attributes: Vec<PhonemeAttributes>) -> Self {
        self.phoneme_attributes = attributes;
        self
    }

    /// Attributes for the phoneme at `index`, if any were set.
    pub fn attributes_at(&self, index: usize) -> Option<&PhonemeAttributes> {
        self.phoneme_attributes.iter().find(|a| a.index == index)
    }

    /// Phonetic hint if it is present and not blank.
    pub fn hint(&self) -> Option<&str> {
        self.phonetic_hint
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }

    /// End position in ticks.
    pub fn end(&self) -> i32 {
        self.position + self.duration
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" pos:{}", self.lyric, self.position)
    }
}

/// One resolved alias with its position relative to the first note, in ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phoneme {
    /// Concrete voicebank alias.
    pub alias: String,
    /// Position relative to the first note of the group.
    pub position: i32,
}

impl Phoneme {
    /// Create a phoneme.
    pub fn new(alias: impl Into<String>, position: i32) -> Self {
        Self {
            alias: alias.into(),
            position,
        }
    }
}

/// Result of phonemizing one note group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonemizerOutput {
    /// Aliases in playback order.
    pub phonemes: Vec<Phoneme>,
}

impl PhonemizerOutput {
    /// Output holding a single alias at position zero.
    pub fn single(alias: impl Into<String>) -> Self {
        Self {
            phonemes: vec![Phoneme::new(alias, 0)],
        }
    }

    /// Alias strings only, in order.
    pub fn aliases(&self) -> Vec<&str> {
        self.phonemes.iter().map(|p| p.alias.as_str()).collect()
    }

    /// Number of phonemes.
    pub fn len(&self) -> usize {
        self.phonemes.len()
    }

    /// Check if the output is empty.
    pub fn is_empty(&self) -> bool {
        self.phonemes.is_empty()
    }
}

/// Tempo information needed to convert between ticks and milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    /// Beats per minute.
    pub bpm: f64,
    /// Note value of one beat (4 = quarter note).
    pub beat_unit: u32,
    /// Ticks per quarter note.
    pub resolution: u32,
}

impl Default for TimeAxis {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            beat_unit: 4,
            resolution: 480,
        }
    }
}

impl TimeAxis {
    /// Create a time axis.
    pub fn new(bpm: f64, beat_unit: u32, resolution: u32) -> Self {
        Self {
            bpm,
            beat_unit,
            resolution,
        }
    }

    fn ms_per_tick(&self) -> f64 {
        60_000.0 / self.bpm * self.beat_unit as f64 / 4.0 / self.resolution as f64
    }

    /// Convert ticks to milliseconds.
    pub fn tick_to_ms(&self, tick: i32) -> f64 {
        tick as f64 * self.ms_per_tick()
    }

    /// Convert milliseconds to ticks, rounding to the nearest tick.
    pub fn ms_to_tick(&self, ms: f64) -> i32 {
        (ms / self.ms_per_tick()).round() as i32
    }

    /// Transition length modifier between 1.0 and 0.33, shorter at high tempo.
    pub fn tempo_factor(&self) -> f64 {
        (300.0 - self.bpm.clamp(90.0, 300.0)) / (300.0 - 90.0) / 3.0 + 0.33
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_kind_from_type_name() {
        assert_eq!(SymbolKind::from_type_name("vowel"), SymbolKind::Vowel);
        assert_eq!(SymbolKind::from_type_name("semivowel"), SymbolKind::Glide);
        assert_eq!(SymbolKind::from_type_name("liquid"), SymbolKind::Glide);
        assert_eq!(SymbolKind::from_type_name("stop"), SymbolKind::Consonant);
        assert!(!SymbolKind::Glide.is_vowel());
    }

    #[test]
    fn test_note_attributes_lookup() {
        let note = Note::new("ka", 60, 0, 480).with_attributes(vec![
            PhonemeAttributes::new(1)
                .with_voice_color("soft")
                .with_tone_shift(12),
        ]);
        assert!(note.attributes_at(0).is_none());
        let attr = note.attributes_at(1).unwrap();
        assert_eq!(attr.voice_color.as_deref(), Some("soft"));
        assert_eq!(attr.tone_shift, 12);
        assert_eq!(note.end(), 480);
    }

    #[test]
    fn test_blank_hint_is_ignored() {
        assert_eq!(Note::new("ka", 60, 0, 480).with_hint("  ").hint(), None);
        assert_eq!(
            Note::new("ka", 60, 0, 480).with_hint(" k a ").hint(),
            Some("k a")
        );
    }

    #[test]
    fn test_time_axis_conversions() {
        let axis = TimeAxis::default();
        // 120 bpm, 480 ticks per quarter: one quarter lasts 500 ms.
        assert!((axis.tick_to_ms(480) - 500.0).abs() < 1e-9);
        assert_eq!(axis.ms_to_tick(500.0), 480);
        assert_eq!(axis.ms_to_tick(100.0), 96);
    }

    #[test]
    fn test_tempo_factor_bounds() {
        assert!((TimeAxis::new(60.0, 4, 480).tempo_factor() - (1.0 / 3.0 + 0.33)).abs() < 1e-9);
        assert!((TimeAxis::new(400.0, 4, 480).tempo_factor() - 0.33).abs() < 1e-9);
    }

    #[test]
    fn test_output_aliases() {
        let output = PhonemizerOutput {
            phonemes: vec![Phoneme::new("-k", -60), Phoneme::new("ka", 0)],
        };
        assert_eq!(output.aliases(), vec!["-k", "ka"]);
        assert_eq!(output.len(), 2);
        assert!(!PhonemizerOutput::single("a").is_empty());
    }
}
