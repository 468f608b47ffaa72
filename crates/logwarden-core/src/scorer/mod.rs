//! Scorer: the pipeline's only outward call.
//!
//! A [`Scorer`] turns an ordered window snapshot into one probability per key,
//! same length, same order, each in `[0.0, 1.0]`, read as "how expected is
//! this key here". The pipeline never looks behind the trait.
//!
//! | Implementation | Behaviour |
//! |----------------|-----------|
//! | [`HashScorer`] | context-free, SHA-256 of the key mapped into `[0.02, 0.99]` |
//! | [`TransitionScorer`] | smoothed `P(key | previous key)` from a pre-built model file |

pub mod hash;
pub mod transition;

pub use hash::HashScorer;
pub use transition::{TransitionModel, TransitionScorer};

use crate::config::{ScorerConfig, ScorerKind};
use crate::error::{ConfigError, ScoringError};
use crate::types::LogKey;
use std::sync::Arc;

pub trait Scorer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Score `keys` in order. Blocking; the pipeline calls this off the async
    /// executor.
    fn score(&self, keys: &[LogKey]) -> Result<Vec<f64>, ScoringError>;
}

/// Build the scorer selected by `[scorer]`.
pub fn from_config(cfg: &ScorerConfig) -> Result<Arc<dyn Scorer>, ConfigError> {
    match cfg.kind {
        ScorerKind::Hash => Ok(Arc::new(HashScorer::new())),
        ScorerKind::Transition => {
            let path = cfg.model_path.clone().ok_or(ConfigError::MissingModelPath)?;
            Ok(Arc::new(TransitionScorer::new(path)))
        }
    }
}
