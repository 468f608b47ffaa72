//! Command-line surface.
//!
//! Flags on `run` override the layered configuration; anything left unset
//! keeps the value from the defaults, the config file, or `LOGWARDEN__*`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use logwarden_core::config::{Config, ScorerKind, SourceKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logwarden", about = "Streaming log anomaly detection", version)]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Detect anomalies in a stream of log lines.
    Run(RunArgs),
    /// Write a log file to stdout line by line, with a delay between lines.
    Replay(ReplayArgs),
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Config file (default: ~/.config/logwarden/config.toml, if present).
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,
    /// Log file to read when the source is `file`.
    #[arg(long)]
    pub path: Option<PathBuf>,
    #[arg(long)]
    pub window_size: Option<usize>,
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Zero or negative alerts on every cycle.
    #[arg(long, allow_negative_numbers = true)]
    pub alert_min_count: Option<i64>,
    #[arg(long, value_enum)]
    pub scorer: Option<ScorerArg>,
    /// Transition model file for the `transition` scorer.
    #[arg(long)]
    pub model: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct ReplayArgs {
    #[arg(default_value = "data/sample_logs.txt")]
    pub path: PathBuf,
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    File,
    Stdin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScorerArg {
    Hash,
    Transition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable log events on stderr.
    #[default]
    Text,
    /// One JSON report per line on stdout.
    Jsonl,
}

impl RunArgs {
    /// Apply the flags that were given on top of `cfg`.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(source) = self.source {
            cfg.source.kind = match source {
                SourceArg::File => SourceKind::File,
                SourceArg::Stdin => SourceKind::Stdin,
            };
        }
        if let Some(path) = &self.path {
            cfg.source.path = Some(path.clone());
        }
        if let Some(size) = self.window_size {
            cfg.window.size = size;
        }
        if let Some(threshold) = self.threshold {
            cfg.detector.threshold = threshold;
        }
        if let Some(min) = self.alert_min_count {
            cfg.detector.alert_min_count = min;
        }
        if let Some(scorer) = self.scorer {
            cfg.scorer.kind = match scorer {
                ScorerArg::Hash => ScorerKind::Hash,
                ScorerArg::Transition => ScorerKind::Transition,
            };
        }
        if let Some(model) = &self.model {
            cfg.scorer.model_path = Some(model.clone());
        }
    }
}
