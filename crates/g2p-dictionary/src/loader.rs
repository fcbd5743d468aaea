//! Dictionary file loaders.
//!
//! Two formats are understood:
//! - YAML documents with `symbols: [{symbol, type}]` and
//!   `entries: [{grapheme, phonemes}]`
//! - CMU-style text: `WORD  PH PH ...`, `;;;` comment lines, `WORD(1)`
//!   alternate pronunciations
//!
//! Malformed input is rejected here, at load time.

use std::collections::HashMap;
use std::path::Path;

use phonemizer_core::{PhonemizerError, PhonemizerResult};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::dictionary::{DictionaryBuilder, G2pDictionary};

#[derive(Debug, Deserialize)]
struct DictionaryDocument {
    #[serde(default)]
    symbols: Vec<SymbolRecord>,
    #[serde(default)]
    entries: Vec<EntryRecord>,
}

#[derive(Debug, Deserialize)]
struct SymbolRecord {
    symbol: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct EntryRecord {
    grapheme: String,
    phonemes: Vec<String>,
}

/// Parse a YAML dictionary document.
pub fn parse_yaml(text: &str, origin: &str) -> PhonemizerResult<G2pDictionary> {
    let document: DictionaryDocument = serde_yaml::from_str(text)
        .map_err(|e| PhonemizerError::dictionary_parse(origin, e.to_string()))?;

    let mut builder = G2pDictionary::builder();
    for record in document.symbols {
        if record.symbol.trim().is_empty() {
            return Err(PhonemizerError::dictionary_parse(origin, "empty symbol"));
        }
        builder = builder.add_symbol_type(record.symbol, &record.kind);
    }
    for (index, record) in document.entries.into_iter().enumerate() {
        if record.grapheme.trim().is_empty() {
            return Err(PhonemizerError::dictionary_parse(
                origin,
                format!("entry {index}: empty grapheme"),
            ));
        }
        if record.phonemes.is_empty() {
            return Err(PhonemizerError::dictionary_parse(
                origin,
                format!("entry {index} ({}): no phonemes", record.grapheme),
            ));
        }
        builder = builder.add_entry(&record.grapheme, record.phonemes);
    }
    Ok(builder.build())
}

/// Parse CMU-style text into an existing builder.
///
/// Each symbol has trailing stress digits stripped (unless the symbol is
/// all digits), then goes through `replacements`.
pub fn parse_cmudict(
    text: &str,
    origin: &str,
    mut builder: DictionaryBuilder,
    replacements: &HashMap<String, String>,
) -> PhonemizerResult<DictionaryBuilder> {
    for (number, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.trim().is_empty() || line.starts_with(";;;") {
            continue;
        }
        let Some((word, phonemes)) = line.split_once("  ").or_else(|| line.split_once('\t'))
        else {
            return Err(PhonemizerError::dictionary_parse(
                origin,
                format!("line {}: expected `WORD  PHONEMES`", number + 1),
            ));
        };
        let word = strip_alternate_marker(word.trim());
        if word.is_empty() || phonemes.trim().is_empty() {
            return Err(PhonemizerError::dictionary_parse(
                origin,
                format!("line {}: empty word or pronunciation", number + 1),
            ));
        }
        let symbols = phonemes.split_whitespace().map(|symbol| {
            let symbol = remove_tail_digits(symbol);
            replacements
                .get(symbol)
                .cloned()
                .unwrap_or_else(|| symbol.to_string())
        });
        builder = builder.add_entry(word, symbols);
    }
    Ok(builder)
}

/// Load a dictionary file, choosing the format by extension.
///
/// `.yaml`/`.yml` files are YAML documents; anything else is CMU text with
/// no symbol inventory.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_file(path: &Path) -> PhonemizerResult<G2pDictionary> {
    let text = read_dictionary(path)?;
    let origin = path.display().to_string();
    let dictionary = if is_yaml(path) {
        parse_yaml(&text, &origin)?
    } else {
        parse_cmudict(&text, &origin, G2pDictionary::builder(), &HashMap::new())?.build()
    };
    debug!(
        entries = dictionary.len(),
        symbols = dictionary.symbol_count(),
        "Loaded dictionary"
    );
    Ok(dictionary)
}

/// Read a dictionary file, mapping I/O failures to a load error.
pub fn read_dictionary(path: &Path) -> PhonemizerResult<String> {
    std::fs::read_to_string(path).map_err(|source| PhonemizerError::DictionaryLoad {
        path: path.to_path_buf(),
        source,
    })
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn strip_alternate_marker(word: &str) -> &str {
    match word.strip_suffix(')').and_then(|w| w.rsplit_once('(')) {
        Some((base, n)) if !base.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => base,
        _ => word,
    }
}

fn remove_tail_digits(symbol: &str) -> &str {
    let trimmed = symbol.trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.is_empty() { symbol } else { trimmed }
}
