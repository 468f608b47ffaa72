//! Context-dependent scorer backed by a pre-built transition model.
//!
//! The model is a JSON document of key counts produced offline:
//!
//! ```json
//! {
//!   "smoothing": 1.0,
//!   "unigrams":    { "INFO User <NUM> logged in from <IP>": 120 },
//!   "transitions": { "INFO User <NUM> logged in from <IP>": { "INFO session opened": 118 } }
//! }
//! ```
//!
//! Position 0 is scored by its smoothed unigram frequency. Every later
//! position is scored as `P(key | previous key)` with additive smoothing over
//! the vocabulary plus one slot for unseen keys. A predecessor the model has
//! never seen falls back to the unigram estimate.

use super::Scorer;
use crate::error::ScoringError;
use crate::types::LogKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

fn default_smoothing() -> f64 { 1.0 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitionModel {
    #[serde(default = "default_smoothing")]
    smoothing: f64,
    #[serde(default)]
    unigrams: HashMap<String, u64>,
    #[serde(default)]
    transitions: HashMap<String, HashMap<String, u64>>,
}

impl TransitionModel {
    /// An empty model with the given additive smoothing.
    pub fn new(smoothing: f64) -> Self {
        Self {
            smoothing,
            ..Self::default()
        }
    }

    /// Add `count` occurrences of `key`.
    pub fn with_unigram(mut self, key: &str, count: u64) -> Self {
        *self.unigrams.entry(key.to_string()).or_default() += count;
        self
    }

    /// Add `count` occurrences of `next` directly following `prev`.
    pub fn with_transition(mut self, prev: &str, next: &str, count: u64) -> Self {
        *self
            .transitions
            .entry(prev.to_string())
            .or_default()
            .entry(next.to_string())
            .or_default() += count;
        self
    }

    /// Read and validate a model file.
    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScoringError::Unavailable(format!("cannot read model {}: {e}", path.display()))
        })?;
        let model: TransitionModel = serde_json::from_str(&text).map_err(|e| {
            ScoringError::Unavailable(format!("cannot parse model {}: {e}", path.display()))
        })?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ScoringError> {
        if !(self.smoothing.is_finite() && self.smoothing > 0.0) {
            return Err(ScoringError::Unavailable(format!(
                "model smoothing must be positive, got {}",
                self.smoothing
            )));
        }
        Ok(())
    }

    fn outcomes(&self) -> f64 {
        (self.unigrams.len() + 1) as f64
    }

    fn unigram_probability(&self, key: &str) -> f64 {
        let total: u64 = self.unigrams.values().sum();
        let count = self.unigrams.get(key).copied().unwrap_or(0);
        (count as f64 + self.smoothing) / (total as f64 + self.smoothing * self.outcomes())
    }

    /// Smoothed probability of `key` given the key before it.
    pub fn probability(&self, prev: Option<&str>, key: &str) -> f64 {
        let Some(next_counts) = prev.and_then(|p| self.transitions.get(p)) else {
            return self.unigram_probability(key);
        };
        let total: u64 = next_counts.values().sum();
        let count = next_counts.get(key).copied().unwrap_or(0);
        let p = (count as f64 + self.smoothing) / (total as f64 + self.smoothing * self.outcomes());
        p.min(1.0)
    }

    pub fn score(&self, keys: &[LogKey]) -> Vec<f64> {
        keys.iter()
            .enumerate()
            .map(|(i, key)| {
                let prev = i.checked_sub(1).map(|j| keys[j].as_str());
                self.probability(prev, key)
            })
            .collect()
    }
}

/// Loads its model lazily and retries on every call until a load succeeds, so
/// a model that appears later is picked up without a restart.
#[derive(Debug)]
pub struct TransitionScorer {
    path: Option<PathBuf>,
    model: Mutex<Option<Arc<TransitionModel>>>,
}

impl TransitionScorer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            model: Mutex::new(None),
        }
    }

    /// Wrap an in-memory model.
    pub fn from_model(model: TransitionModel) -> Self {
        Self {
            path: None,
            model: Mutex::new(Some(Arc::new(model))),
        }
    }

    fn model(&self) -> Result<Arc<TransitionModel>, ScoringError> {
        let mut slot = self
            .model
            .lock()
            .map_err(|_| ScoringError::Unavailable("model lock poisoned".to_string()))?;
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| ScoringError::Unavailable("no model configured".to_string()))?;
        let model = Arc::new(TransitionModel::load(path)?);
        tracing::info!(
            path = %path.display(),
            vocab = model.unigrams.len(),
            "transition model loaded"
        );
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }
}

impl Scorer for TransitionScorer {
    fn name(&self) -> &'static str {
        "transition"
    }

    fn score(&self, keys: &[LogKey]) -> Result<Vec<f64>, ScoringError> {
        Ok(self.model()?.score(keys))
    }
}
