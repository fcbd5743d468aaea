//! Symbol alphabets for the sequence model.
//!
//! Both the grapheme and the phoneme alphabet reserve the first four
//! indices; real symbols start at [`FIRST_SYMBOL`].

use std::collections::HashMap;

/// Padding.
pub const PAD: u32 = 0;
/// Start of sequence.
pub const BOS: u32 = 1;
/// End of sequence; advances the source cursor during decoding.
pub const EOS: u32 = 2;
/// Unknown symbol.
pub const UNK: u32 = 3;
/// Index of the first real symbol.
pub const FIRST_SYMBOL: u32 = 4;

/// Ordered symbol set.
#[derive(Debug, Clone, Default)]
pub struct Alphabet {
    symbols: Vec<String>,
    indices: HashMap<String, u32>,
}

impl Alphabet {
    /// Create an alphabet; the first symbol gets index [`FIRST_SYMBOL`].
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        let indices = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i as u32 + FIRST_SYMBOL))
            .collect();
        Self { symbols, indices }
    }

    /// Parse one symbol per line, skipping blank lines.
    pub fn from_lines(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    /// Number of real symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if there are no real symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Size of the index space, reserved indices included.
    pub fn vocab_size(&self) -> usize {
        self.symbols.len() + FIRST_SYMBOL as usize
    }

    /// Index of a symbol.
    pub fn index_of(&self, symbol: &str) -> Option<u32> {
        self.indices.get(symbol).copied()
    }

    /// Symbol at an index; `None` for reserved or out-of-range indices.
    pub fn symbol(&self, index: u32) -> Option<&str> {
        index
            .checked_sub(FIRST_SYMBOL)
            .and_then(|i| self.symbols.get(i as usize))
            .map(String::as_str)
    }

    /// Encode text character by character, lowercased; unknown characters
    /// become [`UNK`].
    pub fn encode_graphemes(&self, text: &str) -> Vec<u32> {
        text.chars()
            .flat_map(char::to_lowercase)
            .map(|c| {
                let mut buf = [0u8; 4];
                self.index_of(c.encode_utf8(&mut buf)).unwrap_or(UNK)
            })
            .collect()
    }

    /// Decode indices to symbols, dropping reserved and unknown indices.
    pub fn decode(&self, indices: &[u32]) -> Vec<String> {
        indices
            .iter()
            .filter_map(|&i| self.symbol(i))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_layout() {
        let alphabet = Alphabet::new(["a", "b"]);
        assert_eq!(alphabet.index_of("a"), Some(4));
        assert_eq!(alphabet.index_of("b"), Some(5));
        assert_eq!(alphabet.vocab_size(), 6);
        assert_eq!(alphabet.symbol(EOS), None);
        assert_eq!(alphabet.symbol(6), None);
    }

    #[test]
    fn test_encode_lowercases_and_marks_unknown() {
        let alphabet = Alphabet::from_lines("а\nб\n\n");
        assert_eq!(alphabet.encode_graphemes("Аб!"), vec![4, 5, UNK]);
    }

    #[test]
    fn test_decode_strips_reserved() {
        let alphabet = Alphabet::new(["k", "a"]);
        assert_eq!(alphabet.decode(&[BOS, 4, UNK, 5, PAD, 99]), vec!["k", "a"]);
    }
}
