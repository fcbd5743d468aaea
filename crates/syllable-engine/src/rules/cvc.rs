//! `-CV` / `VC` / `C-` decomposition.

use crate::language::LanguageSpec;
use crate::syllable::{Ending, Syllable};

use super::{AliasSlot, RuleContext, can_extend, starting_v};

pub(super) fn process(
    language: &LanguageSpec,
    syllable: &Syllable,
    ctx: &RuleContext<'_>,
) -> Vec<AliasSlot> {
    let (prev_v, cc, v) = (&syllable.prev_v, &syllable.cc, &syllable.v);

    if syllable.is_starting_v() {
        return starting_v(syllable, ctx);
    }
    if syllable.is_vv() {
        if can_extend(language, syllable, ctx) {
            return vec![AliasSlot::Extend];
        }
        let vv = ctx
            .first_present(
                syllable.vowel_tone,
                &[format!("{prev_v} {v}"), format!("{prev_v}{v}")],
            )
            .unwrap_or_else(|| v.clone());
        return vec![AliasSlot::Alias(vv)];
    }

    let Some((last, head)) = cc.split_last() else {
        return Vec::new();
    };
    let mut slots = Vec::with_capacity(cc.len() + 1);

    if syllable.is_starting_cv() {
        slots.extend(head.iter().map(|c| AliasSlot::alias(format!("-{c}"))));
        slots.push(AliasSlot::alias(format!("-{last}{v}")));
        return slots;
    }

    let bare = &language.bare_cv;
    let use_bare = (bare.single_consonant && cc.len() == 1)
        || (bare.short_note && ctx.is_short(syllable.duration))
        || bare.marker.as_deref() == Some(last.as_str());

    slots.push(AliasSlot::alias(format!("{prev_v}{}", cc[0])));
    let offset = if language.is_burst(&cc[0]) { 0 } else { 1 };
    for c in head.iter().skip(offset) {
        slots.push(AliasSlot::Alias(release(c, syllable.tone, ctx)));
    }
    slots.push(AliasSlot::Alias(if use_bare {
        format!("{last}{v}")
    } else {
        format!("-{last}{v}")
    }));
    slots
}

pub(super) fn process_ending(
    _language: &LanguageSpec,
    ending: &Ending,
    ctx: &RuleContext<'_>,
) -> Vec<AliasSlot> {
    let v = &ending.prev_v;
    let Some((first, rest)) = ending.cc.split_first() else {
        return vec![AliasSlot::alias(format!("{v}-"))];
    };
    std::iter::once(format!("{v}{first}-"))
        .chain(rest.iter().map(|c| release(c, ending.tone, ctx)))
        .map(AliasSlot::Alias)
        .collect()
}

/// `C-` when recorded, else the bare consonant.
fn release(consonant: &str, tone: i32, ctx: &RuleContext<'_>) -> String {
    let released = format!("{consonant}-");
    if ctx.has(&released, tone) {
        released
    } else {
        consonant.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use phonemizer_core::MemoryVoicebank;

    use crate::language::LanguageSpec;
    use crate::rules::RuleEngine;
    use crate::rules::tests::{aliases, ctx, ending, syllable};

    fn engine() -> RuleEngine {
        RuleEngine::new(Arc::new(LanguageSpec::builtin("ru-cvc").unwrap()))
    }

    #[test]
    fn test_starting_cluster() {
        let vb = MemoryVoicebank::default();
        let slots = engine().process(&syllable("", &["s", "t"], "a"), &ctx(&vb));
        assert_eq!(aliases(&slots), vec!["-s", "-ta"]);
    }

    #[test]
    fn test_vcv_single_consonant_is_bare() {
        let vb = MemoryVoicebank::default();
        let slots = engine().process(&syllable("a", &["m"], "a"), &ctx(&vb));
        assert_eq!(aliases(&slots), vec!["am", "ma"]);
    }

    #[test]
    fn test_vcv_cluster_with_burst_head() {
        let vb = MemoryVoicebank::new(["t-"]);
        let mut s = syllable("a", &["t", "s", "k"], "o");
        s.duration = Some(960);
        let slots = engine().process(&s, &ctx(&vb));
        // `t` is a burst so it also gets its own release
        assert_eq!(aliases(&slots), vec!["at", "t-", "s", "-ko"]);
    }

    #[test]
    fn test_vcv_cluster_short_note_is_bare() {
        let vb = MemoryVoicebank::default();
        let mut s = syllable("a", &["s", "k"], "o");
        s.duration = Some(120);
        let slots = engine().process(&s, &ctx(&vb));
        assert_eq!(aliases(&slots), vec!["as", "ko"]);
    }

    #[test]
    fn test_vv_without_extension() {
        let vb = MemoryVoicebank::new(["a o"]);
        let slots = engine().process(&syllable("a", &[], "o"), &ctx(&vb));
        assert_eq!(aliases(&slots), vec!["a o"]);

        let empty = MemoryVoicebank::default();
        let slots = engine().process(&syllable("a", &[], "o"), &ctx(&empty));
        assert_eq!(aliases(&slots), vec!["o"]);
    }

    #[test]
    fn test_endings() {
        let vb = MemoryVoicebank::new(["t-"]);
        let e = engine();
        assert_eq!(aliases(&e.process_ending(&ending("a", &[]), &ctx(&vb))), vec!["a-"]);
        assert_eq!(
            aliases(&e.process_ending(&ending("a", &["s", "t"]), &ctx(&vb))),
            vec!["as-", "t-"]
        );
    }
}
