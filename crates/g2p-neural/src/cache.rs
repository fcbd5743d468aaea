//! Prediction cache.

use dashmap::DashMap;
use metrics::counter;

/// Exact input text to predicted phonemes.
///
/// Append-only for the lifetime of the predictor. Concurrent writers for
/// the same key race harmlessly: the first stored value wins and every
/// caller sees it.
#[derive(Debug, Default)]
pub struct PredictionCache {
    entries: DashMap<String, Vec<String>>,
}

impl PredictionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached phonemes for the exact text.
    pub fn get(&self, text: &str) -> Option<Vec<String>> {
        let hit = self.entries.get(text).map(|entry| entry.value().clone());
        if hit.is_some() {
            counter!("g2p_cache_hits_total").increment(1);
        }
        hit
    }

    /// Store a prediction unless one is already present; return the stored value.
    pub fn insert(&self, text: &str, phonemes: Vec<String>) -> Vec<String> {
        self.entries
            .entry(text.to_string())
            .or_insert(phonemes)
            .value()
            .clone()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_wins() {
        let cache = PredictionCache::new();
        assert!(cache.get("ka").is_none());
        assert_eq!(cache.insert("ka", vec!["k".into(), "a".into()]), vec!["k", "a"]);
        assert_eq!(cache.insert("ka", vec!["g".into()]), vec!["k", "a"]);
        assert_eq!(cache.get("ka"), Some(vec!["k".to_string(), "a".to_string()]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_exact() {
        let cache = PredictionCache::new();
        cache.insert("Ka", vec!["k".into()]);
        assert!(cache.get("ka").is_none());
        assert!(cache.get("Ka").is_some());
    }

    #[test]
    fn test_concurrent_inserts() {
        let cache = std::sync::Arc::new(PredictionCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.insert("la", vec![format!("l{i}")]))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(cache.len(), 1);
    }
}
