//! Syllable-based phonemizer: the host-facing entry point.
//!
//! One instance serves one track. Shared language assets come from the
//! [`LanguageRegistry`]; the voicebank and the G2P chain built around it are
//! per instance and swapped atomically by [`SyllablePhonemizer::set_singer`].

use std::sync::Arc;

use g2p_dictionary::layers::{layer_path, load_layer};
use g2p_dictionary::{G2pChain, LayerSource};
use parking_lot::RwLock;
use phonemizer_core::{
    G2p, Note, Phoneme, PhonemizerConfig, PhonemizerOutput, PhonemizerResult, Voicebank,
};
use syllable_engine::{AliasSlot, Ending, LanguageSpec, RuleContext, RuleEngine, Segmenter};
use tracing::{debug, instrument};

use crate::registry::{LanguageAssets, LanguageRegistry};
use crate::resolver::AliasResolver;
use crate::timing::Timing;
use crate::warm::{FORCED_ALIAS_PREFIX, lyric_words, needs_g2p, warm_g2p_cache};

struct SingerState {
    voicebank: Option<Arc<dyn Voicebank>>,
    chain: Arc<G2pChain>,
}

/// Phonemizer for one language.
pub struct SyllablePhonemizer {
    language: Arc<LanguageSpec>,
    config: PhonemizerConfig,
    assets: Arc<LanguageAssets>,
    engine: RuleEngine,
    state: RwLock<SingerState>,
}

impl SyllablePhonemizer {
    /// Create a phonemizer backed by the process-wide registry.
    pub fn new(language: LanguageSpec, config: PhonemizerConfig) -> Self {
        Self::with_registry(language, config, LanguageRegistry::global())
    }

    /// Create a phonemizer for a built-in language.
    pub fn for_language(id: &str, config: PhonemizerConfig) -> PhonemizerResult<Self> {
        Ok(Self::new(LanguageSpec::builtin(id)?, config))
    }

    /// Create a phonemizer backed by a specific registry.
    pub fn with_registry(
        language: LanguageSpec,
        config: PhonemizerConfig,
        registry: &LanguageRegistry,
    ) -> Self {
        let language = Arc::new(language);
        let assets = registry.get_or_load(language.clone(), &config);
        let chain = Arc::new(build_chain(&assets, None));
        Self {
            engine: RuleEngine::new(language.clone()),
            language,
            config,
            assets,
            state: RwLock::new(SingerState {
                voicebank: None,
                chain,
            }),
        }
    }

    pub fn language(&self) -> &LanguageSpec {
        &self.language
    }

    /// The current G2P chain.
    pub fn chain(&self) -> Arc<G2pChain> {
        self.state.read().chain.clone()
    }

    /// Attach a voicebank and rebuild the chain with its local dictionary.
    #[instrument(skip_all, fields(language = %self.language.id))]
    pub fn set_singer(&self, voicebank: Option<Arc<dyn Voicebank>>) {
        let chain = Arc::new(build_chain(&self.assets, voicebank.as_deref()));
        debug!(sources = ?chain.sources(), "Singer set");
        *self.state.write() = SingerState { voicebank, chain };
    }

    /// Prepare for a phrase: resolve every word once so `process` hits warm
    /// caches.
    ///
    /// # Returns
    /// How many distinct words were resolved.
    pub fn set_up(&self, groups: &[Vec<Note>]) -> usize {
        warm_g2p_cache(&self.chain(), groups)
    }

    /// Phonemize one note group.
    ///
    /// `notes` are the group's notes, the first carrying the lyric.
    /// `prev_neighbours` is the previous group, used to carry its trailing
    /// consonants into this group's first syllable. Ending aliases are added
    /// only when there is no `next_neighbour`. Positions are relative to the
    /// first note.
    #[instrument(skip_all, fields(lyric = notes.first().map(|n| n.lyric.as_str()).unwrap_or_default()))]
    pub fn process(
        &self,
        notes: &[Note],
        _prev: Option<&Note>,
        _next: Option<&Note>,
        _prev_neighbour: Option<&Note>,
        next_neighbour: Option<&Note>,
        prev_neighbours: &[Note],
    ) -> PhonemizerOutput {
        let Some(main) = notes.first() else {
            return PhonemizerOutput::default();
        };
        if let Some(alias) = main.lyric.strip_prefix(FORCED_ALIAS_PREFIX) {
            return PhonemizerOutput::single(alias);
        }

        let (voicebank, chain) = {
            let state = self.state.read();
            (state.voicebank.clone(), state.chain.clone())
        };
        let voicebank = voicebank.as_deref();
        let timing = Timing::from_config(&self.language, &self.config.timing);
        let ctx = RuleContext::new(voicebank, timing.time_axis(), timing.transition_ms());

        let placed = match main.hint() {
            Some(hint) => timing.place(&[AliasSlot::alias(hint)], None, 0, false),
            None => self.place_syllables(
                &chain,
                &timing,
                &ctx,
                notes,
                next_neighbour,
                prev_neighbours,
            ),
        };

        let resolver = AliasResolver::new(&self.language, voicebank);
        let mut phonemes = assign_affixes(placed, notes, prev_neighbours, &resolver);
        if phonemes.is_empty() {
            phonemes.push(Phoneme::new(main.lyric.clone(), 0));
        }
        PhonemizerOutput { phonemes }
    }

    fn place_syllables(
        &self,
        chain: &G2pChain,
        timing: &Timing<'_>,
        ctx: &RuleContext<'_>,
        notes: &[Note],
        next_neighbour: Option<&Note>,
        prev_neighbours: &[Note],
    ) -> Vec<Phoneme> {
        let segmenter = Segmenter::new(&self.language);
        let prev_ending = self.ending_of(chain, &segmenter, prev_neighbours);
        let word = segmenter.prepare(symbols(chain, &notes[0]), notes);

        let mut placed = Vec::new();
        for syllable in segmenter.make_syllables(&word, prev_ending.as_ref()) {
            let slots = self.engine.process(&syllable, ctx);
            placed.extend(timing.place(&slots, syllable.duration, syllable.position, false));
        }
        if next_neighbour.is_none() {
            if let Some(ending) = segmenter.make_ending(&word) {
                let slots = self.engine.process_ending(&ending, ctx);
                placed.extend(timing.place(&slots, Some(ending.duration), ending.position, true));
            }
        }
        placed
    }

    /// Trailing consonants of the previous group, if it went through G2P.
    fn ending_of(
        &self,
        chain: &G2pChain,
        segmenter: &Segmenter<'_>,
        group: &[Note],
    ) -> Option<Ending> {
        let first = group.first().filter(|n| needs_g2p(n))?;
        let word = segmenter.prepare(symbols(chain, first), group);
        segmenter.make_ending(&word)
    }
}

fn build_chain(assets: &LanguageAssets, voicebank: Option<&dyn Voicebank>) -> G2pChain {
    let local = voicebank
        .and_then(|vb| vb.location())
        .map(|dir| load_layer(LayerSource::Voicebank, &layer_path(dir, &assets.language.id)));

    let mut builder = G2pChain::builder()
        .maybe_layer(
            LayerSource::Plugin,
            assets.plugin.dictionary().map(|d| d as Arc<dyn G2p>),
        )
        .maybe_layer(
            LayerSource::Voicebank,
            local
                .and_then(|layer| layer.dictionary())
                .map(|d| d as Arc<dyn G2p>),
        )
        .maybe_layer(LayerSource::Builtin, assets.builtin_g2p());
    if let Some(neural) = assets.neural_g2p() {
        builder = builder.neural(neural);
    }
    builder.build()
}

/// Phonemes of a note's lyric, word by word.
fn symbols(chain: &G2pChain, note: &Note) -> Vec<String> {
    lyric_words(&note.lyric)
        .iter()
        .flat_map(|word| chain.resolve(word))
        .collect()
}

/// Resolve each alias at the tone sounding at its position, with the
/// attributes the user set for its index.
fn assign_affixes(
    placed: Vec<Phoneme>,
    notes: &[Note],
    prevs: &[Note],
    resolver: &AliasResolver<'_>,
) -> Vec<Phoneme> {
    let origin = notes[0].position;
    let mut note_index = 0;
    placed
        .into_iter()
        .enumerate()
        .map(|(i, phoneme)| {
            let attr = notes[0].attributes_at(i);
            let color = attr.and_then(|a| a.voice_color.as_deref());
            let tone_shift = attr.map_or(0, |a| a.tone_shift);

            while note_index + 1 < notes.len()
                && notes[note_index].position - origin < phoneme.position
            {
                note_index += 1;
            }
            let note_start = notes[note_index].position - origin;
            let tone = match prevs.last() {
                Some(prev) if phoneme.position < note_start => prev.tone,
                _ if note_index > 0 && phoneme.position < note_start => notes[note_index - 1].tone,
                _ => notes[note_index].tone,
            };

            let alias = resolver
                .resolve(&phoneme.alias, tone, color, tone_shift)
                .into_alias();
            Phoneme::new(alias, phoneme.position)
        })
        .collect()
}
