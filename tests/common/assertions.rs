//! Domain-specific assertions for logwarden harnesses.
//!
//! These pull the interesting report out of a run and fail with a message
//! that names the pipeline stage that misbehaved.

use logwarden::report::{DetectionReport, Report, RunSummary, SkippedCycle};

// ---------------------------------------------------------------------------
// Report extraction
// ---------------------------------------------------------------------------

/// Every detection report in emission order.
pub fn detections(reports: &[Report]) -> Vec<&DetectionReport> {
    reports
        .iter()
        .filter_map(|r| match r {
            Report::Detection(d) => Some(d),
            _ => None,
        })
        .collect()
}

/// Every skipped-cycle report in emission order.
pub fn skipped(reports: &[Report]) -> Vec<&SkippedCycle> {
    reports
        .iter()
        .filter_map(|r| match r {
            Report::Skipped(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Number of warm-up reports.
pub fn warmups(reports: &[Report]) -> usize {
    reports
        .iter()
        .filter(|r| matches!(r, Report::WarmingUp(_)))
        .count()
}

/// The run's summary, which must be the last report and appear exactly once.
pub fn summary(reports: &[Report]) -> &RunSummary {
    let count = reports
        .iter()
        .filter(|r| matches!(r, Report::Summary(_)))
        .count();
    assert_eq!(count, 1, "expected exactly one summary report, found {count}");
    match reports.last() {
        Some(Report::Summary(s)) => s,
        other => panic!("summary must be the final report, got {other:?}"),
    }
}

/// Anomalous positions of each detection cycle, from the report previews.
pub fn preview_positions(reports: &[Report]) -> Vec<Vec<usize>> {
    detections(reports)
        .iter()
        .map(|d| d.preview.iter().map(|a| a.position).collect())
        .collect()
}

// ---------------------------------------------------------------------------
// Macros
// ---------------------------------------------------------------------------

/// Assert the alert flag of every detection cycle, in order.
///
/// ```rust
/// assert_alerts!(reports, [false, true, true]);
/// ```
#[macro_export]
macro_rules! assert_alerts {
    ($reports:expr, [$($flag:expr),* $(,)?]) => {{
        let reports: &[logwarden::report::Report] = &$reports;
        let actual: Vec<bool> = $crate::common::detections(reports)
            .iter()
            .map(|d| d.alert)
            .collect();
        let expected: Vec<bool> = vec![$($flag),*];
        if actual != expected {
            panic!(
                "assert_alerts! failed:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            );
        }
    }};
}

/// Assert the window holds exactly `keys`, oldest first.
///
/// ```rust
/// assert_window!(pipeline, ["INFO a", "INFO b"]);
/// ```
#[macro_export]
macro_rules! assert_window {
    ($pipeline:expr, [$($key:expr),* $(,)?]) => {{
        let actual: Vec<String> = $pipeline
            .window()
            .snapshot()
            .iter()
            .map(|k| k.to_string())
            .collect();
        let expected: Vec<String> = vec![$($key.to_string()),*];
        if actual != expected {
            panic!(
                "assert_window! failed:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            );
        }
    }};
}
