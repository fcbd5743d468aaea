//! Greedy decoding over a [`SequenceModel`].

use std::sync::Arc;

use phonemizer_core::PhonemizerResult;
use tracing::{instrument, trace};

use crate::alphabet::{Alphabet, BOS, EOS};
use crate::model::SequenceModel;

/// Default cap on the decoded target length, start symbol included.
pub const DEFAULT_MAX_OUTPUT_LEN: usize = 48;

/// Grapheme-to-phoneme predictor.
pub struct Predictor {
    model: Arc<dyn SequenceModel>,
    graphemes: Alphabet,
    phonemes: Alphabet,
    max_output_len: usize,
}

impl Predictor {
    /// Create a predictor over a model and its two alphabets.
    pub fn new(model: Arc<dyn SequenceModel>, graphemes: Alphabet, phonemes: Alphabet) -> Self {
        Self {
            model,
            graphemes,
            phonemes,
            max_output_len: DEFAULT_MAX_OUTPUT_LEN,
        }
    }

    /// Set the decoding cap.
    pub fn with_max_output_len(mut self, max_output_len: usize) -> Self {
        self.max_output_len = max_output_len.max(1);
        self
    }

    /// Phoneme alphabet.
    pub fn phonemes(&self) -> &Alphabet {
        &self.phonemes
    }

    /// Predict phonemes for a grapheme string.
    ///
    /// The target starts as `[BOS]` with the cursor on the first source
    /// symbol. `EOS` from the model advances the cursor; any other index is
    /// appended. Stops once the cursor passes the source or the target
    /// reaches the cap, so the model runs at most `src + cap` times.
    #[instrument(skip(self), fields(steps = tracing::field::Empty))]
    pub fn predict(&self, grapheme: &str) -> PhonemizerResult<Vec<String>> {
        let src = self.graphemes.encode_graphemes(grapheme);
        let mut tgt = vec![BOS];
        let mut cursor = 0;
        let mut steps = 0usize;

        while cursor < src.len() && tgt.len() < self.max_output_len {
            let next = self.model.next_index(&src, &tgt, cursor)?;
            steps += 1;
            if next == EOS {
                cursor += 1;
            } else {
                tgt.push(next);
            }
        }

        tracing::Span::current().record("steps", steps);
        let phonemes = self.phonemes.decode(&tgt[1..]);
        trace!(grapheme, ?phonemes, "Predicted");
        Ok(phonemes)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::alphabet::FIRST_SYMBOL;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Emits one phoneme per grapheme (same index), then EOS; counts calls.
    #[derive(Default)]
    pub(crate) struct MockModel {
        pub calls: AtomicUsize,
    }

    impl SequenceModel for MockModel {
        fn next_index(&self, src: &[u32], tgt: &[u32], cursor: usize) -> PhonemizerResult<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if tgt.len() - 1 <= cursor {
                Ok(src[cursor])
            } else {
                Ok(EOS)
            }
        }
    }

    /// Never emits EOS.
    struct Runaway;

    impl SequenceModel for Runaway {
        fn next_index(&self, _src: &[u32], _tgt: &[u32], _cursor: usize) -> PhonemizerResult<u32> {
            Ok(FIRST_SYMBOL)
        }
    }

    struct Failing;

    impl SequenceModel for Failing {
        fn next_index(&self, _src: &[u32], _tgt: &[u32], _cursor: usize) -> PhonemizerResult<u32> {
            Err(phonemizer_core::PhonemizerError::inference("broken weights"))
        }
    }

    fn alphabets() -> (Alphabet, Alphabet) {
        (Alphabet::new(["k", "a", "t"]), Alphabet::new(["k", "a", "t"]))
    }

    #[test]
    fn test_predict_one_per_grapheme() {
        let (g, p) = alphabets();
        let model = Arc::new(MockModel::default());
        let predictor = Predictor::new(model.clone(), g, p);
        assert_eq!(predictor.predict("KaT").unwrap(), vec!["k", "a", "t"]);
        // three emits plus three EOS
        assert_eq!(model.calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_unknown_graphemes_are_dropped() {
        let (g, p) = alphabets();
        let predictor = Predictor::new(Arc::new(MockModel::default()), g, p);
        assert_eq!(predictor.predict("kxa").unwrap(), vec!["k", "a"]);
    }

    #[test]
    fn test_output_is_capped() {
        let (g, p) = alphabets();
        let predictor = Predictor::new(Arc::new(Runaway), g, p).with_max_output_len(5);
        assert_eq!(predictor.predict("ka").unwrap().len(), 4);
    }

    #[test]
    fn test_model_error_propagates() {
        let (g, p) = alphabets();
        let predictor = Predictor::new(Arc::new(Failing), g, p);
        assert!(predictor.predict("ka").is_err());
        assert!(predictor.predict("").unwrap().is_empty());
    }
}
