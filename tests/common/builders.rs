//! Test builders: pipelines, line streams, and scripted scorers.
//!
//! These are designed for readability in test assertions, not for production
//! use. They panic on invalid input rather than returning `Result`.

use futures::Stream;
use logwarden::{LogKey, Pipeline, PipelineSettings, Scorer, ScoringError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

// ---------------------------------------------------------------------------
// PipelineBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Pipeline`] fixtures.
///
/// ```rust
/// let pipeline = PipelineBuilder::new(4)
///     .threshold(0.1)
///     .alert_min_count(2)
///     .scorer(KeyScorer::by_prefix("ERROR", 0.01, 0.9))
///     .build();
/// ```
pub struct PipelineBuilder {
    settings: PipelineSettings,
    scorer: Arc<dyn Scorer>,
}

impl PipelineBuilder {
    pub fn new(window_size: usize) -> Self {
        Self {
            settings: PipelineSettings {
                window_size,
                threshold: 0.1,
                alert_min_count: 2,
                preview_len: 5,
                scoring_timeout: None,
            },
            scorer: Arc::new(logwarden::scorer::HashScorer::new()),
        }
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.settings.threshold = threshold;
        self
    }

    pub fn alert_min_count(mut self, min: i64) -> Self {
        self.settings.alert_min_count = min;
        self
    }

    pub fn preview_len(mut self, len: usize) -> Self {
        self.settings.preview_len = len;
        self
    }

    pub fn timeout(mut self, limit: Duration) -> Self {
        self.settings.scoring_timeout = Some(limit);
        self
    }

    pub fn scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Arc::new(scorer);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline::new(self.settings, self.scorer).expect("valid pipeline settings")
    }
}

// ---------------------------------------------------------------------------
// Line streams
// ---------------------------------------------------------------------------

/// A finite source yielding `lines` in order.
pub fn line_stream<I, S>(lines: I) -> impl Stream<Item = std::io::Result<String>> + Unpin
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let lines: Vec<std::io::Result<String>> = lines.into_iter().map(|l| Ok(l.into())).collect();
    futures::stream::iter(lines)
}

/// `line-0` … `line-{n-1}`.
pub fn numbered_lines(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("line-{i}")).collect()
}

// ---------------------------------------------------------------------------
// Scripted scorers
// ---------------------------------------------------------------------------

/// Scores each key with a plain function of its text.
pub struct KeyScorer {
    f: Box<dyn Fn(&str) -> f64 + Send + Sync>,
}

impl KeyScorer {
    pub fn new(f: impl Fn(&str) -> f64 + Send + Sync + 'static) -> Self {
        Self { f: Box::new(f) }
    }

    /// `low` for keys starting with `prefix`, `high` for the rest.
    pub fn by_prefix(prefix: &'static str, low: f64, high: f64) -> Self {
        Self::new(move |k| if k.starts_with(prefix) { low } else { high })
    }

    pub fn constant(p: f64) -> Self {
        Self::new(move |_| p)
    }
}

impl Scorer for KeyScorer {
    fn name(&self) -> &'static str {
        "key"
    }

    fn score(&self, keys: &[LogKey]) -> Result<Vec<f64>, ScoringError> {
        Ok(keys.iter().map(|k| (self.f)(k)).collect())
    }
}

/// Fails every call whose 1-based index is a multiple of `every`, and
/// scores everything else `0.9`. `every = 1` fails always.
pub struct FlakyScorer {
    every: usize,
    calls: AtomicUsize,
}

impl FlakyScorer {
    pub fn new(every: usize) -> Self {
        Self {
            every,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always() -> Self {
        Self::new(1)
    }
}

impl Scorer for FlakyScorer {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn score(&self, keys: &[LogKey]) -> Result<Vec<f64>, ScoringError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call % self.every == 0 {
            return Err(ScoringError::Unavailable(format!("model offline (call {call})")));
        }
        Ok(vec![0.9; keys.len()])
    }
}

/// Blocks for `delay` before answering.
pub struct SlowScorer {
    pub delay: Duration,
}

impl Scorer for SlowScorer {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn score(&self, keys: &[LogKey]) -> Result<Vec<f64>, ScoringError> {
        std::thread::sleep(self.delay);
        Ok(vec![0.9; keys.len()])
    }
}

/// Returns whatever vector it was given, regardless of input length.
pub struct CannedScorer {
    pub probs: Vec<f64>,
}

impl Scorer for CannedScorer {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn score(&self, _keys: &[LogKey]) -> Result<Vec<f64>, ScoringError> {
        Ok(self.probs.clone())
    }
}

/// Call counters shared between a [`GatedScorer`] and the test driving it.
#[derive(Debug, Default)]
pub struct GateStats {
    pub calls: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
}

/// Blocks every call until the test sends one `()` through the returned
/// sender, or drops it. Scores everything `0.9`.
pub struct GatedScorer {
    gate: Mutex<mpsc::Receiver<()>>,
    stats: Arc<GateStats>,
}

impl GatedScorer {
    pub fn new() -> (Self, mpsc::Sender<()>, Arc<GateStats>) {
        let (tx, rx) = mpsc::channel();
        let stats = Arc::new(GateStats::default());
        let scorer = Self {
            gate: Mutex::new(rx),
            stats: Arc::clone(&stats),
        };
        (scorer, tx, stats)
    }
}

impl Scorer for GatedScorer {
    fn name(&self) -> &'static str {
        "gated"
    }

    fn score(&self, keys: &[LogKey]) -> Result<Vec<f64>, ScoringError> {
        self.stats.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_active.fetch_max(now, Ordering::SeqCst);
        let _ = self.gate.lock().unwrap().recv();
        self.stats.active.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![0.9; keys.len()])
    }
}
