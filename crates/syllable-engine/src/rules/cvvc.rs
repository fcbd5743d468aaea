//! `- CV` / `V C` / `CV` / `V -` decomposition with cluster lookups.

use crate::language::LanguageSpec;
use crate::syllable::{Ending, Syllable};

use super::{AliasSlot, RuleContext, can_extend, starting_v};

pub(super) fn process(
    language: &LanguageSpec,
    syllable: &Syllable,
    ctx: &RuleContext<'_>,
) -> Vec<AliasSlot> {
    let (prev_v, cc, v) = (&syllable.prev_v, &syllable.cc, &syllable.v);
    let (tone, vowel_tone) = (syllable.tone, syllable.vowel_tone);

    if syllable.is_starting_v() {
        return starting_v(syllable, ctx);
    }
    if syllable.is_vv() {
        if can_extend(language, syllable, ctx) {
            return vec![AliasSlot::Extend];
        }
        return vec![AliasSlot::Alias(
            ctx.pick(vowel_tone, &[format!("{prev_v} {v}"), format!("{prev_v}{v}")]),
        )];
    }
    if syllable.is_starting_cv_with_one_consonant() {
        return starting_cv(&cc[0], v, tone, vowel_tone, ctx);
    }

    let mut slots = Vec::with_capacity(cc.len() + 2);
    let first_c = if syllable.is_starting_cv() {
        let all = cc.concat();
        if let Some(rccv) = ctx.first_present(vowel_tone, &dashed(&format!("{all}{v}"))) {
            return vec![AliasSlot::Alias(rccv)];
        }
        let (lead, covered) = (2..=cc.len())
            .rev()
            .find_map(|n| {
                ctx.first_present(tone, &dashed(&cc[..n].concat()))
                    .map(|lead| (lead, n))
            })
            .unwrap_or_else(|| (ctx.pick(tone, &dashed(&cc[0])), 1));
        slots.push(AliasSlot::Alias(lead));
        covered - 1
    } else {
        if cc.len() == 1 {
            let vcv = format!("{prev_v} {}{v}", cc[0]);
            if ctx.has(&vcv, vowel_tone) {
                return vec![AliasSlot::Alias(vcv)];
            }
        }
        slots.push(AliasSlot::Alias(ctx.pick(
            tone,
            &[format!("{prev_v} {}", cc[0]), format!("{prev_v}{}", cc[0])],
        )));
        0
    };

    let (base, last_c) = (first_c..cc.len() - 1)
        .find_map(|i| {
            let ccv = format!("{}{v}", cc[i..].concat());
            ctx.has(&ccv, vowel_tone).then_some((ccv, i))
        })
        .unwrap_or_else(|| (format!("{}{v}", cc[cc.len() - 1]), cc.len() - 1));
    slots.extend(chain(language, cc, first_c, last_c, tone, ctx));
    slots.push(AliasSlot::Alias(base));
    slots
}

pub(super) fn process_ending(
    language: &LanguageSpec,
    ending: &Ending,
    ctx: &RuleContext<'_>,
) -> Vec<AliasSlot> {
    let (v, cc, tone) = (&ending.prev_v, &ending.cc, ending.tone);
    match cc.as_slice() {
        [] => vec![AliasSlot::Alias(ctx.pick(
            tone,
            &[format!("{v} -"), format!("{v}-"), format!("{v} R")],
        ))],
        [c] => match ctx.first_present(tone, &[format!("{v}{c}-"), format!("{v} {c}-")]) {
            Some(vcr) => vec![AliasSlot::Alias(vcr)],
            None => vec![
                AliasSlot::alias(format!("{v} {c}")),
                AliasSlot::Alias(release(c, tone, ctx)),
            ],
        },
        [first, .., last] => {
            let mut slots = vec![AliasSlot::Alias(
                ctx.pick(tone, &[format!("{v} {first}"), format!("{v}{first}")]),
            )];
            slots.extend(chain(language, cc, 0, cc.len() - 1, tone, ctx));
            slots.push(AliasSlot::Alias(release(last, tone, ctx)));
            slots
        }
    }
}

fn starting_cv(c: &str, v: &str, tone: i32, vowel_tone: i32, ctx: &RuleContext<'_>) -> Vec<AliasSlot> {
    let lead = ctx.first_present(tone, &dashed(c));
    let cv = format!("{c}{v}");
    match lead {
        Some(lead) if ctx.has(&cv, vowel_tone) => {
            vec![AliasSlot::Alias(lead), AliasSlot::Alias(cv)]
        }
        lead => match ctx.first_present(vowel_tone, &dashed(&cv)) {
            Some(rcv) => vec![AliasSlot::Alias(rcv)],
            None => lead
                .into_iter()
                .chain(std::iter::once(cv))
                .map(AliasSlot::Alias)
                .collect(),
        },
    }
}

/// Transitions between `cc[from]` and `cc[to]`.
///
/// A burst at the start of the run is released on its own.
fn chain(
    language: &LanguageSpec,
    cc: &[String],
    from: usize,
    to: usize,
    tone: i32,
    ctx: &RuleContext<'_>,
) -> Vec<AliasSlot> {
    (from..to)
        .map(|i| {
            let (a, b) = (&cc[i], &cc[i + 1]);
            let alias = if i == from && language.is_burst(a) {
                release(a, tone, ctx)
            } else {
                ctx.pick(tone, &[format!("{a} {b}"), format!("{a}{b}")])
            };
            AliasSlot::Alias(alias)
        })
        .collect()
}

fn release(consonant: &str, tone: i32, ctx: &RuleContext<'_>) -> String {
    ctx.pick(tone, &[format!("{consonant} -"), format!("{consonant}-")])
}

fn dashed(tail: &str) -> [String; 2] {
    [format!("-{tail}"), format!("- {tail}")]
}
