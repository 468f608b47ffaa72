//! Deterministic fallback scorer.

use super::Scorer;
use crate::error::ScoringError;
use crate::types::LogKey;
use sha2::{Digest, Sha256};

const LOW: f64 = 0.02;
const HIGH: f64 = 0.99;

/// Scores each key by a stable hash, ignoring context. The same key always
/// gets the same probability, which makes runs reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashScorer;

impl HashScorer {
    pub fn new() -> Self {
        HashScorer
    }

    /// Probability for a single key.
    pub fn probability(key: &str) -> f64 {
        let digest = Sha256::digest(key.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        let unit = u64::from_be_bytes(head) as f64 / u64::MAX as f64;
        LOW + unit * (HIGH - LOW)
    }
}

impl Scorer for HashScorer {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn score(&self, keys: &[LogKey]) -> Result<Vec<f64>, ScoringError> {
        Ok(keys.iter().map(|k| Self::probability(k)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_score() {
        let keys = vec![LogKey::from("INFO ok"), LogKey::from("WARN x"), LogKey::from("INFO ok")];
        let scores = HashScorer::new().score(&keys).unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0], scores[2]);
        assert_eq!(scores, HashScorer::new().score(&keys).unwrap());
    }

    #[test]
    fn scores_stay_in_range() {
        for i in 0..500 {
            let p = HashScorer::probability(&format!("key {i}"));
            assert!((LOW..=HIGH).contains(&p), "{p} out of range");
        }
        assert!((LOW..=HIGH).contains(&HashScorer::probability("")));
    }

    #[test]
    fn empty_input_scores_nothing() {
        assert!(HashScorer::new().score(&[]).unwrap().is_empty());
    }
}
