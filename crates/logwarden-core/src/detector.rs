//! Detector: flags low-probability window positions and decides whether the
//! anomaly count warrants an alert.

use crate::error::DetectError;
use crate::types::{Anomaly, LogKey};

/// Return every position whose probability is strictly below `threshold`, in
/// ascending position order. Repeated keys are judged independently.
pub fn detect(keys: &[LogKey], probs: &[f64], threshold: f64) -> Result<Vec<Anomaly>, DetectError> {
    if keys.len() != probs.len() {
        return Err(DetectError::LengthMismatch {
            keys: keys.len(),
            probs: probs.len(),
        });
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(DetectError::InvalidThreshold(threshold));
    }

    Ok(keys
        .iter()
        .zip(probs)
        .enumerate()
        .filter(|(_, (_, p))| **p < threshold)
        .map(|(position, (key, p))| Anomaly::new(position, key.clone(), *p))
        .collect())
}

/// `true` when `anomaly_count` reaches `alert_min_count`.
///
/// A non-positive `alert_min_count` alerts unconditionally, even with zero
/// anomalies.
pub fn should_alert(anomaly_count: usize, alert_min_count: i64) -> bool {
    if alert_min_count <= 0 {
        return true;
    }
    anomaly_count as u64 >= alert_min_count as u64
}
