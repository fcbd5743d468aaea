//! G2P cache warm-up.

use std::collections::HashSet;

use g2p_dictionary::{G2pChain, ResolvedBy};
use phonemizer_core::Note;
use tracing::{debug, info, instrument};

/// Lyrics starting with this render as the alias that follows.
pub const FORCED_ALIAS_PREFIX: &str = "?";

/// Words of a lyric as G2P keys: trimmed, lowercased, split on spaces and
/// underscores.
pub fn lyric_words(lyric: &str) -> Vec<String> {
    lyric
        .trim()
        .to_lowercase()
        .split([' ', '_'])
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a group's words go through G2P at all.
pub fn needs_g2p(note: &Note) -> bool {
    note.hint().is_none() && !note.lyric.starts_with(FORCED_ALIAS_PREFIX)
}

/// Resolve every distinct word of the groups' lyrics.
///
/// Words answered by the neural source land in its cache, so later
/// `process` calls never run inference for them.
///
/// # Returns
/// How many distinct words were resolved.
#[instrument(skip_all, fields(groups = groups.len()))]
pub fn warm_g2p_cache(chain: &G2pChain, groups: &[Vec<Note>]) -> usize {
    let words: HashSet<String> = groups
        .iter()
        .filter_map(|group| group.first())
        .filter(|note| needs_g2p(note))
        .flat_map(|note| lyric_words(&note.lyric))
        .collect();

    let mut predicted = 0;
    for word in &words {
        let (source, phonemes) = chain.resolve_traced(word);
        debug!(word = %word, %source, ?phonemes, "Warmed");
        if source == ResolvedBy::Neural {
            predicted += 1;
        }
    }

    info!(words = words.len(), predicted, "G2P cache warmed");
    words.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use g2p_dictionary::{G2pDictionary, LayerSource};

    #[test]
    fn test_lyric_words() {
        assert_eq!(lyric_words("  Hola_Mundo  que "), vec!["hola", "mundo", "que"]);
        assert!(lyric_words(" _ ").is_empty());
    }

    #[test]
    fn test_warm_counts_distinct_words() {
        let dict = G2pDictionary::builder()
            .add_entry("la", ["l", "a"])
            .build();
        let chain = G2pChain::builder()
            .layer(LayerSource::Plugin, Arc::new(dict))
            .build();
        let groups = vec![
            vec![Note::new("la la", 60, 0, 480)],
            vec![Note::new("La", 60, 480, 480)],
            vec![Note::new("?forced", 60, 960, 480)],
            vec![Note::new("hinted", 60, 1440, 480).with_hint("l a")],
            Vec::new(),
        ];
        assert_eq!(warm_g2p_cache(&chain, &groups), 1);
    }
}
