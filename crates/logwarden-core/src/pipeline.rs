//! Pipeline driver: normalize → window → score → detect, one line at a time.
//!
//! # States
//!
//! ```text
//! WarmingUp ──(window full)──► Active ──► Exhausted
//!     │                          │
//!     └──────────────────────────┴──────► Cancelled
//! ```
//!
//! While warming up a line is normalised and pushed, nothing more. The push
//! that fills the window switches to `Active` and is scored on the spot; from
//! then on every line triggers a full detection cycle on the complete window.
//!
//! Lines are handled strictly in arrival order by the caller's task. The
//! cancellation token is checked before each read, never between a push and
//! the cycle that follows it, so the window always reflects exactly the lines
//! that were reported.
//!
//! A scoring call that outlives its timeout keeps its blocking thread. The
//! pipeline remembers it and fails later cycles as unavailable until it
//! returns, so a hung scorer holds at most one thread.

use crate::config::Config;
use crate::detector::{detect, should_alert};
use crate::error::{ConfigError, ScoringError};
use crate::normalizer::normalize;
use crate::report::{
    DetectionReport, Report, ReportSink, RunOutcome, RunSummary, SkippedCycle, WarmupProgress,
};
use crate::scorer::Scorer;
use crate::types::LogKey;
use crate::window::Window;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    WarmingUp,
    Active,
    Exhausted,
    Cancelled,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Exhausted | PipelineState::Cancelled)
    }
}

/// Plain values the driver runs with, independent of how they were loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub window_size: usize,
    pub threshold: f64,
    pub alert_min_count: i64,
    pub preview_len: usize,
    /// `None` waits for the scorer indefinitely.
    pub scoring_timeout: Option<Duration>,
}

impl PipelineSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            window_size: cfg.window.size,
            threshold: cfg.detector.threshold,
            alert_min_count: cfg.detector.alert_min_count,
            preview_len: cfg.detector.preview_len,
            scoring_timeout: cfg.scorer.timeout(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&Config::defaults())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    processed: u64,
    cycles: u64,
    skipped: u64,
    anomalies: u64,
    alerts: u64,
}

pub struct Pipeline {
    window: Window,
    scorer: Arc<dyn Scorer>,
    settings: PipelineSettings,
    state: PipelineState,
    counters: Counters,
    /// A timed-out scoring call that has not returned yet.
    stalled: Option<JoinHandle<Result<Vec<f64>, ScoringError>>>,
}

enum Next {
    Line(String),
    Exhausted,
    Cancelled,
}

impl Pipeline {
    /// Fails if the window size or threshold is out of range; nothing has been
    /// read at that point.
    pub fn new(settings: PipelineSettings, scorer: Arc<dyn Scorer>) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&settings.threshold) {
            return Err(ConfigError::InvalidThreshold(settings.threshold));
        }
        let window = Window::new(settings.window_size)?;
        Ok(Self {
            window,
            scorer,
            settings,
            state: PipelineState::WarmingUp,
            counters: Counters::default(),
            stalled: None,
        })
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn processed(&self) -> u64 {
        self.counters.processed
    }

    /// Consume `source` until it ends or `cancel` fires, emitting one report per
    /// line and a final summary.
    pub async fn run<S>(
        &mut self,
        mut source: S,
        cancel: &CancellationToken,
        sink: &mut dyn ReportSink,
    ) -> RunSummary
    where
        S: Stream<Item = std::io::Result<String>> + Unpin,
    {
        if self.state.is_terminal() {
            return self.summary();
        }

        tracing::info!(
            window = self.settings.window_size,
            threshold = self.settings.threshold,
            alert_min_count = self.settings.alert_min_count,
            scorer = self.scorer.name(),
            "pipeline started"
        );

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => Next::Cancelled,
                item = source.next() => match item {
                    Some(Ok(line)) => Next::Line(line),
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "input source failed; treating as exhausted");
                        Next::Exhausted
                    }
                    None => Next::Exhausted,
                },
            };

            match next {
                Next::Line(line) => {
                    if let Some(report) = self.process_line(&line).await {
                        sink.emit(&report);
                    }
                }
                Next::Exhausted => {
                    self.state = PipelineState::Exhausted;
                    break;
                }
                Next::Cancelled => {
                    tracing::info!(processed = self.counters.processed, "cancelled");
                    self.state = PipelineState::Cancelled;
                    break;
                }
            }
        }

        let summary = self.summary();
        sink.emit(&Report::Summary(summary.clone()));
        summary
    }

    /// Handle one raw line and describe what happened to it. Returns `None`
    /// without touching the window once the pipeline is exhausted or
    /// cancelled.
    pub async fn process_line(&mut self, raw: &str) -> Option<Report> {
        if self.state.is_terminal() {
            return None;
        }
        Some(self.handle_line(raw).await)
    }

    async fn handle_line(&mut self, raw: &str) -> Report {
        self.counters.processed += 1;
        let processed = self.counters.processed;

        let snapshot = self.window.push(normalize(raw));

        if self.state == PipelineState::WarmingUp {
            if !self.window.is_full() {
                return Report::WarmingUp(WarmupProgress {
                    processed,
                    size: self.window.size(),
                    capacity: self.window.capacity(),
                });
            }
            tracing::info!(processed, "window full; detection active");
            self.state = PipelineState::Active;
        }

        let probs = match self.score(snapshot.clone()).await {
            Ok(probs) => probs,
            Err(e) => {
                tracing::warn!(processed, error = %e, scorer = self.scorer.name(), "scoring failed");
                return self.skip(processed, e.to_string());
            }
        };

        let anomalies = match detect(&snapshot, &probs, self.settings.threshold) {
            Ok(anomalies) => anomalies,
            Err(e) => {
                tracing::error!(processed, error = %e, "detector rejected its inputs");
                return self.skip(processed, e.to_string());
            }
        };

        let alert = should_alert(anomalies.len(), self.settings.alert_min_count);
        self.counters.cycles += 1;
        self.counters.anomalies += anomalies.len() as u64;
        if alert {
            self.counters.alerts += 1;
        }

        Report::Detection(DetectionReport {
            processed,
            window_len: snapshot.len(),
            anomaly_count: anomalies.len(),
            threshold: self.settings.threshold,
            alert,
            preview: anomalies
                .into_iter()
                .take(self.settings.preview_len)
                .collect(),
        })
    }

    fn skip(&mut self, processed: u64, reason: String) -> Report {
        self.counters.skipped += 1;
        Report::Skipped(SkippedCycle { processed, reason })
    }

    /// Run the scorer on a blocking thread and check its output against the
    /// snapshot it was given.
    async fn score(&mut self, keys: Vec<LogKey>) -> Result<Vec<f64>, ScoringError> {
        if self.stalled.as_ref().is_some_and(|task| !task.is_finished()) {
            return Err(ScoringError::Unavailable(
                "previous scoring call still running".to_string(),
            ));
        }
        self.stalled = None;

        let expected = keys.len();
        let scorer = Arc::clone(&self.scorer);
        let mut task = tokio::task::spawn_blocking(move || scorer.score(&keys));

        let joined = match self.settings.scoring_timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    self.stalled = Some(task);
                    return Err(ScoringError::Timeout(limit));
                }
            },
            None => task.await,
        };
        let probs = joined
            .map_err(|e| ScoringError::Unavailable(format!("scoring task failed: {e}")))??;

        if probs.len() != expected {
            return Err(ScoringError::LengthMismatch {
                expected,
                actual: probs.len(),
            });
        }
        if let Some((position, &value)) = probs
            .iter()
            .enumerate()
            .find(|(_, p)| !(0.0..=1.0).contains(*p))
        {
            return Err(ScoringError::OutOfRange { position, value });
        }
        Ok(probs)
    }

    fn summary(&self) -> RunSummary {
        let outcome = match self.state {
            PipelineState::Cancelled => RunOutcome::Cancelled,
            _ => RunOutcome::Exhausted,
        };
        RunSummary {
            processed: self.counters.processed,
            cycles: self.counters.cycles,
            skipped: self.counters.skipped,
            anomalies: self.counters.anomalies,
            alerts: self.counters.alerts,
            outcome,
        }
    }
}
