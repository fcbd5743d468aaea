//! Phonemize command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use phonemizer_core::{Note, PhonemizerConfig, Subbank, Voicebank};
use runtime::SyllablePhonemizer;
use syllable_engine::{LanguageSpec, is_extension_note};
use tracing::debug;

use super::load_voicebank;

/// Options for the phonemize command.
pub struct PhonemizeOptions {
    pub lyrics: Vec<String>,
    pub language: LanguageSpec,
    pub voicebank: Option<PathBuf>,
    pub subbanks: Vec<String>,
    pub tone: i32,
    pub duration: i32,
    pub json: bool,
}

/// Run the phonemize command.
pub fn run(options: PhonemizeOptions, config: PhonemizerConfig) -> Result<()> {
    let phonemizer = SyllablePhonemizer::new(options.language, config);
    if let Some(path) = &options.voicebank {
        let voicebank = options
            .subbanks
            .iter()
            .try_fold(load_voicebank(path)?, |vb, spec| {
                parse_subbank(spec).map(|subbank| vb.with_subbank(subbank))
            })?;
        phonemizer.set_singer(Some(Arc::new(voicebank) as Arc<dyn Voicebank>));
    } else if !options.subbanks.is_empty() {
        bail!("--subbank needs --voicebank");
    }

    let groups = note_groups(&options.lyrics, options.tone, options.duration);
    let words = phonemizer.set_up(&groups);
    debug!(groups = groups.len(), words, "Phrase set up");

    let mut rows = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        let prevs: &[Note] = match i.checked_sub(1) {
            Some(p) => &groups[p],
            None => &[],
        };
        let prev = prevs.last();
        let next = groups.get(i + 1).and_then(|g| g.first());
        let output = phonemizer.process(group, prev, next, prev, next, prevs);
        let origin = group[0].position;
        for phoneme in output.phonemes {
            rows.push((group[0].lyric.clone(), phoneme.alias, origin + phoneme.position));
        }
    }

    if options.json {
        let json: Vec<_> = rows
            .iter()
            .map(|(lyric, alias, position)| {
                serde_json::json!({ "lyric": lyric, "alias": alias, "position": position })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{:<12} {:>8}  alias", "lyric", "tick");
        for (lyric, alias, position) in &rows {
            println!("{lyric:<12} {position:>8}  {alias}");
        }
    }

    Ok(())
}

/// One note per lyric, back to back; continuation lyrics join the previous
/// group.
fn note_groups(lyrics: &[String], tone: i32, duration: i32) -> Vec<Vec<Note>> {
    let mut groups: Vec<Vec<Note>> = Vec::new();
    for (i, lyric) in lyrics.iter().enumerate() {
        let note = Note::new(lyric.as_str(), tone, i as i32 * duration, duration);
        let continues = lyric == "+" || is_extension_note(&note);
        match groups.last_mut() {
            Some(group) if continues => group.push(note),
            _ => groups.push(vec![note]),
        }
    }
    groups
}

/// Parse `LOW-HIGH:SUFFIX` or `COLOR=LOW-HIGH:SUFFIX`.
fn parse_subbank(spec: &str) -> Result<Subbank> {
    let (color, rest) = match spec.split_once('=') {
        Some((color, rest)) => (Some(color), rest),
        None => (None, spec),
    };
    let Some((range, suffix)) = rest.split_once(':') else {
        bail!("subbank {spec}: expected LOW-HIGH:SUFFIX");
    };
    let Some((low, high)) = range.split_once('-') else {
        bail!("subbank {spec}: expected a LOW-HIGH tone range");
    };
    let low = low.trim().parse().with_context(|| format!("subbank {spec}: bad low tone"))?;
    let high = high.trim().parse().with_context(|| format!("subbank {spec}: bad high tone"))?;

    let subbank = Subbank::new(low, high, suffix);
    Ok(match color {
        Some(color) => subbank.with_color(color),
        None => subbank,
    })
}
