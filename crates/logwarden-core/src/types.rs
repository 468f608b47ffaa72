//! Core types for logwarden-core.
//!
//! This module defines the values that flow between pipeline stages: the
//! normalised [`LogKey`], a detected [`Anomaly`], and the [`Severity`] that
//! distinguishes alerts from informational reports.

use serde::{Serialize, Serializer};
use std::sync::Arc;

/// A normalised log template derived from exactly one raw line.
///
/// Keys are immutable and cheap to clone: the window hands out snapshots on
/// every push, so the text is shared rather than copied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogKey(Arc<str>);

impl LogKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        LogKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Deref for LogKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LogKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LogKey {
    fn from(key: &str) -> Self {
        LogKey(Arc::from(key))
    }
}

impl From<String> for LogKey {
    fn from(key: String) -> Self {
        LogKey(Arc::from(key))
    }
}

impl std::fmt::Display for LogKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LogKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A window position whose probability fell below the detection threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    /// Index within the window snapshot the scores were computed from.
    pub position: usize,
    pub key: LogKey,
    pub probability: f64,
}

impl Anomaly {
    pub fn new(position: usize, key: LogKey, probability: f64) -> Self {
        Self {
            position,
            key,
            probability,
        }
    }
}

/// How loudly a report should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Alert,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Alert => write!(f, "alert"),
        }
    }
}
