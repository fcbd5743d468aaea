//! Metric names and descriptions.
//!
//! Counters are emitted through the `metrics` facade; without an installed
//! recorder they are no-ops. Hosts that want numbers install their own
//! recorder and then call [`register_metrics`].

use metrics::{counter, describe_counter};

/// Neural predictions answered from the cache.
pub const G2P_CACHE_HITS: &str = "g2p_cache_hits_total";
/// Neural model invocations.
pub const G2P_INFERENCE: &str = "g2p_inference_total";
/// Aliases resolved through a fallback substitute.
pub const ALIAS_FALLBACK: &str = "alias_fallback_total";
/// Aliases with no present candidate.
pub const ALIAS_MISS: &str = "alias_miss_total";

/// Describe every counter the phonemizer emits.
pub fn register_metrics() {
    describe_counter!(G2P_CACHE_HITS, "Neural G2P predictions served from the cache");
    describe_counter!(G2P_INFERENCE, "Neural G2P model invocations");
    describe_counter!(
        ALIAS_FALLBACK,
        "Aliases resolved through an alias or phoneme substitute"
    );
    describe_counter!(
        ALIAS_MISS,
        "Aliases with no present candidate, rendered literally"
    );
}

pub(crate) fn alias_fallback() {
    counter!(ALIAS_FALLBACK).increment(1);
}

pub(crate) fn alias_miss() {
    counter!(ALIAS_MISS).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_without_recorder() {
        // These should not panic even without a recorder
        register_metrics();
        alias_fallback();
        alias_miss();
    }
}
