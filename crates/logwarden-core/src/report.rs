//! Reports emitted by the pipeline and the sinks that surface them.
//!
//! Every processed line produces exactly one [`Report`]; a run ends with a
//! [`Report::Summary`]. Sinks decide how loudly each report is surfaced:
//!
//! | Sink | Output |
//! |------|--------|
//! | [`TracingSink`] | `tracing` events, alerts at `WARN` |
//! | [`JsonLinesSink`] | one JSON object per report |
//! | `Vec<Report>` | collected in memory |

use crate::types::{Anomaly, Severity};
use serde::Serialize;
use std::io::Write;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    WarmingUp(WarmupProgress),
    Detection(DetectionReport),
    Skipped(SkippedCycle),
    Summary(RunSummary),
}

impl Report {
    pub fn severity(&self) -> Severity {
        match self {
            Report::Detection(d) if d.alert => Severity::Alert,
            _ => Severity::Info,
        }
    }
}

/// A line was absorbed while the window is still filling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarmupProgress {
    pub processed: u64,
    pub size: usize,
    pub capacity: usize,
}

/// Outcome of one full detection cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    pub processed: u64,
    pub window_len: usize,
    pub anomaly_count: usize,
    pub threshold: f64,
    pub alert: bool,
    /// The first few anomalies in position order, capped by `preview_len`.
    pub preview: Vec<Anomaly>,
}

/// Detection could not run for this line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedCycle {
    pub processed: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    /// The source ran dry.
    Exhausted,
    /// A stop was requested.
    Cancelled,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Exhausted => write!(f, "exhausted"),
            RunOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub processed: u64,
    /// Detection cycles that completed.
    pub cycles: u64,
    /// Cycles skipped because scoring or detection failed.
    pub skipped: u64,
    pub anomalies: u64,
    pub alerts: u64,
    pub outcome: RunOutcome,
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

pub trait ReportSink: Send {
    fn emit(&mut self, report: &Report);
}

impl ReportSink for Vec<Report> {
    fn emit(&mut self, report: &Report) {
        self.push(report.clone());
    }
}

/// Surfaces reports as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&mut self, report: &Report) {
        match report {
            Report::WarmingUp(p) => tracing::debug!(
                processed = p.processed,
                window = p.size,
                capacity = p.capacity,
                "warming up"
            ),
            Report::Detection(d) if d.alert => tracing::warn!(
                processed = d.processed,
                window = d.window_len,
                anomalies = d.anomaly_count,
                threshold = d.threshold,
                preview = %format_preview(&d.preview),
                "ALERT anomalous window"
            ),
            Report::Detection(d) => tracing::info!(
                processed = d.processed,
                window = d.window_len,
                anomalies = d.anomaly_count,
                threshold = d.threshold,
                preview = %format_preview(&d.preview),
                "window scored"
            ),
            Report::Skipped(s) => tracing::warn!(
                processed = s.processed,
                reason = %s.reason,
                "detection skipped"
            ),
            Report::Summary(s) => tracing::info!(
                processed = s.processed,
                cycles = s.cycles,
                skipped = s.skipped,
                anomalies = s.anomalies,
                alerts = s.alerts,
                outcome = %s.outcome,
                "input finished"
            ),
        }
    }
}

/// `position:probability` pairs, e.g. `1:0.050, 3:0.090`.
pub fn format_preview(preview: &[Anomaly]) -> String {
    preview
        .iter()
        .map(|a| format!("{}:{:.3}", a.position, a.probability))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Serialize)]
struct Record<'a> {
    ts: chrono::DateTime<chrono::Utc>,
    severity: Severity,
    #[serde(flatten)]
    report: &'a Report,
}

/// Writes one JSON object per report, flushing after each line so a
/// downstream reader sees alerts as they happen.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, report: &Report) -> std::io::Result<()> {
        let record = Record {
            ts: chrono::Utc::now(),
            severity: report.severity(),
            report,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write + Send> ReportSink for JsonLinesSink<W> {
    fn emit(&mut self, report: &Report) {
        if let Err(e) = self.write_record(report) {
            tracing::error!(error = %e, "failed to write report");
        }
    }
}
