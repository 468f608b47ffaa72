//! Error taxonomy for the detection pipeline.
//!
//! - [`ConfigError`] is fatal and raised before any input is consumed.
//! - [`DetectError`] means the detector was called with inconsistent inputs.
//! - [`ScoringError`] is recoverable: the driver skips the cycle and moves on.

use std::time::Duration;

/// Invalid or unloadable configuration. The pipeline must not start.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("window size must be at least 1, got {0}")]
    InvalidWindowSize(usize),
    #[error("threshold must be within [0.0, 1.0], got {0}")]
    InvalidThreshold(f64),
    #[error("source.path is required when source.kind = \"file\"")]
    MissingSourcePath,
    #[error("scorer.model_path is required when scorer.kind = \"transition\"")]
    MissingModelPath,
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Detector preconditions violated by the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectError {
    #[error("length mismatch: keys={keys} probs={probs}")]
    LengthMismatch { keys: usize, probs: usize },
    #[error("threshold must be within [0.0, 1.0], got {0}")]
    InvalidThreshold(f64),
}

/// The scorer could not produce a usable score vector for this cycle.
///
/// Every variant is treated the same way by the driver: log, skip detection
/// for the cycle, keep consuming input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("scoring unavailable: {0}")]
    Unavailable(String),
    #[error("scoring timed out after {0:?}")]
    Timeout(Duration),
    #[error("scorer returned {actual} probabilities for {expected} keys")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("scorer returned out-of-range probability {value} at position {position}")]
    OutOfRange { position: usize, value: f64 },
}
