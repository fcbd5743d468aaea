//! Alias placement in ticks.

use phonemizer_core::{Phoneme, TimeAxis, TimingConfig};
use syllable_engine::{AliasSlot, LanguageSpec, transition_weight};

/// Places rule engine output on the time axis.
///
/// Each alias gets a transition length; lengths are packed backwards from
/// the anchor position, shrunk when they overflow their container.
#[derive(Debug, Clone, Copy)]
pub struct Timing<'a> {
    language: &'a LanguageSpec,
    time_axis: TimeAxis,
    transition_ms: f64,
}

impl<'a> Timing<'a> {
    /// `transition_ms` is used as is, without tempo scaling.
    pub fn new(language: &'a LanguageSpec, time_axis: TimeAxis, transition_ms: f64) -> Self {
        Self {
            language,
            time_axis,
            transition_ms,
        }
    }

    /// Base transition scaled by the tempo factor.
    pub fn from_config(language: &'a LanguageSpec, config: &TimingConfig) -> Self {
        let time_axis = config.time_axis();
        Self::new(
            language,
            time_axis,
            config.transition_ms * time_axis.tempo_factor(),
        )
    }

    pub fn time_axis(&self) -> TimeAxis {
        self.time_axis
    }

    /// Tempo-scaled transition length before alias weighting.
    pub fn transition_ms(&self) -> f64 {
        self.transition_ms
    }

    /// Transition length of one alias.
    pub fn transition_ticks(&self, alias: &str) -> i32 {
        self.time_axis
            .ms_to_tick(self.transition_ms * transition_weight(self.language, alias))
    }

    /// Place slots that end at `position`.
    ///
    /// For a syllable the last slot is the vowel and starts at `position`;
    /// for an ending every slot precedes it and the last one is twice as
    /// long. `Extend` slots take no time and are dropped.
    pub fn place(
        &self,
        slots: &[AliasSlot],
        container: Option<i32>,
        position: i32,
        is_ending: bool,
    ) -> Vec<Phoneme> {
        let last = slots.len().saturating_sub(1);
        let lengths: Vec<i32> = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| match slot {
                AliasSlot::Extend => 0,
                AliasSlot::Alias(alias) => {
                    let ticks = self.transition_ticks(alias);
                    match (i == last, is_ending) {
                        (false, _) => ticks,
                        (true, false) => 0,
                        (true, true) => ticks * 2,
                    }
                }
            })
            .collect();

        let safe = self.time_axis.ms_to_tick(self.transition_ms * 2.0);
        let total: i32 = lengths.iter().sum();
        let modifier = match container {
            Some(container) if container > 0 && total + safe > container => {
                container as f64 / (total + safe) as f64
            }
            _ => 1.0,
        };

        let mut offset = 0;
        let mut placed = Vec::with_capacity(slots.len());
        for (slot, length) in slots.iter().zip(lengths).rev() {
            let length = (length as f64 * modifier) as i32 / 5 * 5;
            if let AliasSlot::Alias(alias) = slot {
                placed.push(Phoneme::new(alias.clone(), position - length - offset));
            }
            offset += length;
        }
        placed.reverse();
        placed
    }
}
