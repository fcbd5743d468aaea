//! Splits a note group's phonemes into syllables and an ending.

use phonemizer_core::Note;
use tracing::trace;

use crate::language::{GlidePolicy, LanguageSpec};
use crate::syllable::{Ending, Syllable};

/// Whether a note continues the previous syllable's vowel.
pub fn is_extension_note(note: &Note) -> bool {
    note.lyric.starts_with("+~") || note.lyric.starts_with("+*")
}

/// Phonemes of a note group aligned with its notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub symbols: Vec<String>,
    /// Indices of the vowels in `symbols`; never empty.
    pub vowel_ids: Vec<usize>,
    /// At least one note per vowel.
    pub notes: Vec<Note>,
}

/// Syllable segmenter for one language.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'a> {
    language: &'a LanguageSpec,
}

impl<'a> Segmenter<'a> {
    pub fn new(language: &'a LanguageSpec) -> Self {
        Self { language }
    }

    /// Align symbols with the notes of their group.
    ///
    /// Empty input becomes a single empty symbol. Extension notes repeat the
    /// vowel before them. If there are more vowels than notes, the last note
    /// is split.
    pub fn prepare(&self, symbols: Vec<String>, notes: &[Note]) -> Word {
        let symbols = if symbols.is_empty() {
            vec![String::new()]
        } else {
            self.join_glides(symbols)
        };
        let symbols = self.apply_extensions(symbols, notes);
        let vowel_ids = self.vowel_ids(&symbols);
        let notes = if notes.len() < vowel_ids.len() {
            split_last_note(notes, vowel_ids.len())
        } else {
            notes.to_vec()
        };
        Word {
            symbols,
            vowel_ids,
            notes,
        }
    }

    /// Vowel indices; the last symbol stands in when there is no vowel.
    pub fn vowel_ids(&self, symbols: &[String]) -> Vec<usize> {
        let ids: Vec<usize> = symbols
            .iter()
            .enumerate()
            .filter(|(_, s)| self.language.is_vowel(s))
            .map(|(i, _)| i)
            .collect();
        if ids.is_empty() {
            vec![symbols.len().saturating_sub(1)]
        } else {
            ids
        }
    }

    /// Apply the language's glide policy.
    pub fn join_glides(&self, symbols: Vec<String>) -> Vec<String> {
        if self.language.glide_policy == GlidePolicy::Cluster {
            return symbols;
        }
        let mut joined = Vec::with_capacity(symbols.len());
        let mut iter = symbols.into_iter().peekable();
        while let Some(symbol) = iter.next() {
            if self.language.is_glide(&symbol) {
                if let Some(next) = iter.peek() {
                    let nucleus = format!("{symbol}{next}");
                    if self.language.is_vowel(next) && self.language.is_vowel(&nucleus) {
                        iter.next();
                        joined.push(nucleus);
                        continue;
                    }
                }
            }
            joined.push(symbol);
        }
        joined
    }

    fn apply_extensions(&self, symbols: Vec<String>, notes: &[Note]) -> Vec<String> {
        let vowel_ids = self.vowel_ids(&symbols);
        let mut extended: Vec<String> = symbols[..=vowel_ids[0]].to_vec();
        let mut last = 0;
        for note in notes.iter().skip(1) {
            if last + 1 >= vowel_ids.len() {
                break;
            }
            if is_extension_note(note) {
                extended.push(symbols[vowel_ids[last]].clone());
            } else {
                let prev = vowel_ids[last];
                last += 1;
                extended.extend_from_slice(&symbols[prev + 1..=vowel_ids[last]]);
            }
        }
        extended.extend_from_slice(&symbols[vowel_ids[last] + 1..]);
        extended
    }

    /// Build the syllables of a word, without its ending.
    ///
    /// A previous group's ending supplies the first syllable's previous
    /// vowel and leading consonants.
    pub fn make_syllables(&self, word: &Word, prev_ending: Option<&Ending>) -> Vec<Syllable> {
        let Some(first_note) = word.notes.first() else {
            return Vec::new();
        };
        let first_vowel = word.vowel_ids[0];
        let leading = &word.symbols[..first_vowel];

        let mut syllables = Vec::with_capacity(word.vowel_ids.len());
        syllables.push(match prev_ending {
            Some(ending) => Syllable {
                prev_v: ending.prev_v.clone(),
                cc: ending.cc.iter().chain(leading).cloned().collect(),
                v: word.symbols[first_vowel].clone(),
                position: 0,
                duration: Some(ending.duration),
                tone: ending.tone,
                attr: ending.attr.clone(),
                vowel_tone: first_note.tone,
                vowel_attr: first_note.phoneme_attributes.clone(),
                prev_word_consonants_count: ending.cc.len(),
                can_alias_be_extended: false,
            },
            None => Syllable {
                cc: leading.to_vec(),
                v: word.symbols[first_vowel].clone(),
                tone: first_note.tone,
                attr: first_note.phoneme_attributes.clone(),
                vowel_tone: first_note.tone,
                vowel_attr: first_note.phoneme_attributes.clone(),
                ..Default::default()
            },
        });

        let mut note_i = 1;
        let mut position = 0;
        let mut cc = Vec::new();
        for (i, symbol) in word.symbols.iter().enumerate().skip(first_vowel + 1) {
            if note_i >= word.notes.len() {
                break;
            }
            if !word.vowel_ids.contains(&i) {
                cc.push(symbol.clone());
                continue;
            }
            let prev_note = &word.notes[note_i - 1];
            let note = &word.notes[note_i];
            position += prev_note.duration;
            let prev_v = syllables[note_i - 1].v.clone();
            syllables.push(Syllable {
                prev_v,
                cc: std::mem::take(&mut cc),
                v: symbol.clone(),
                position,
                duration: Some(prev_note.duration),
                tone: prev_note.tone,
                attr: prev_note.phoneme_attributes.clone(),
                vowel_tone: note.tone,
                vowel_attr: note.phoneme_attributes.clone(),
                prev_word_consonants_count: 0,
                can_alias_be_extended: true,
            });
            note_i += 1;
        }

        trace!(syllables = ?syllables.iter().map(ToString::to_string).collect::<Vec<_>>(), "Segmented");
        syllables
    }

    /// The consonants after a word's last vowel.
    pub fn make_ending(&self, word: &Word) -> Option<Ending> {
        let last_note = word.notes.last()?;
        let last_vowel = *word.vowel_ids.last()?;
        Some(Ending {
            prev_v: word.symbols[last_vowel].clone(),
            cc: word.symbols[last_vowel + 1..].to_vec(),
            position: word.notes.iter().map(|n| n.duration).sum(),
            duration: word
                .notes
                .iter()
                .skip(word.vowel_ids.len() - 1)
                .map(|n| n.duration)
                .sum(),
            tone: last_note.tone,
            attr: last_note.phoneme_attributes.clone(),
        })
    }
}

/// Split the last note so there are `syllables` notes.
///
/// Parts are rounded down to multiples of 15 ticks; the remainder goes to
/// the final part.
pub fn split_last_note(notes: &[Note], syllables: usize) -> Vec<Note> {
    let Some((last, head)) = notes.split_last() else {
        return Vec::new();
    };
    let parts = syllables.saturating_sub(head.len()).max(1) as i32;
    let part = last.duration / parts / 15 * 15;

    let mut split = head.to_vec();
    let mut position = last.position;
    for i in 0..parts {
        let duration = if i + 1 < parts {
            part
        } else {
            last.duration - part * (parts - 1)
        };
        split.push(Note {
            lyric: String::new(),
            phonetic_hint: None,
            tone: last.tone,
            position,
            duration,
            phoneme_attributes: last.phoneme_attributes.clone(),
        });
        position += duration;
    }
    split
}
