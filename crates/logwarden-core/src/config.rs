//! Configuration types for logwarden.
//!
//! [`Config::load`] layers, in increasing priority: the embedded defaults, a
//! TOML file (`~/.config/logwarden/config.toml` unless a path is given), and
//! `LOGWARDEN__SECTION__KEY` environment variables. [`Config::defaults`]
//! returns the embedded defaults without touching the filesystem.
//!
//! Loading only parses; [`Config::validate`] enforces the ranges the pipeline
//! relies on and must pass before any input is read.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[window]
size = 100

[detector]
threshold       = 0.1
alert_min_count = 2
preview_len     = 5

[source]
kind       = "file"
path       = "data/sample_logs.txt"
skip_blank = true

[scorer]
kind       = "hash"
timeout_ms = 5000
"#;

const ENV_PREFIX: &str = "LOGWARDEN";
const ENV_SEPARATOR: &str = "__";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub scorer: ScorerConfig,
}

/// `[window]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_size")]
    pub size: usize,
}

fn default_window_size() -> usize { 100 }

impl Default for WindowConfig {
    fn default() -> Self {
        Self { size: default_window_size() }
    }
}

/// `[detector]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Minimum anomalies per window to alert. Zero or negative alerts on
    /// every cycle.
    #[serde(default = "default_alert_min_count")]
    pub alert_min_count: i64,
    #[serde(default = "default_preview_len")]
    pub preview_len: usize,
}

fn default_threshold() -> f64 { 0.1 }
fn default_alert_min_count() -> i64 { 2 }
fn default_preview_len() -> usize { 5 }

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            alert_min_count: default_alert_min_count(),
            preview_len: default_preview_len(),
        }
    }
}

/// Where raw lines come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Stdin,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Stdin => write!(f, "stdin"),
        }
    }
}

/// `[source]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_kind")]
    pub kind: SourceKind,
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Drop lines that are empty after trimming before they reach the core.
    #[serde(default = "default_skip_blank")]
    pub skip_blank: bool,
}

fn default_source_kind() -> SourceKind { SourceKind::File }
fn default_skip_blank() -> bool { true }

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source_kind(),
            path: Some(PathBuf::from("data/sample_logs.txt")),
            skip_blank: default_skip_blank(),
        }
    }
}

/// Which scorer implementation the pipeline is wired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    Hash,
    Transition,
}

impl std::fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScorerKind::Hash => write!(f, "hash"),
            ScorerKind::Transition => write!(f, "transition"),
        }
    }
}

/// `[scorer]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScorerConfig {
    #[serde(default = "default_scorer_kind")]
    pub kind: ScorerKind,
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    /// Per-call scoring timeout in milliseconds; 0 disables it.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_scorer_kind() -> ScorerKind { ScorerKind::Hash }
fn default_timeout_ms() -> u64 { 5000 }

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            kind: default_scorer_kind(),
            model_path: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ScorerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration using the process environment.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`Config::load`], but reads `LOGWARDEN__*` overrides from `env`
    /// instead of the process environment when it is `Some`.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::from(config_path().as_path()).required(false),
        };

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Check every value the pipeline depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.size < 1 {
            return Err(ConfigError::InvalidWindowSize(self.window.size));
        }
        if !(0.0..=1.0).contains(&self.detector.threshold) {
            return Err(ConfigError::InvalidThreshold(self.detector.threshold));
        }
        if self.source.kind == SourceKind::File && self.source.path.is_none() {
            return Err(ConfigError::MissingSourcePath);
        }
        if self.scorer.kind == ScorerKind::Transition && self.scorer.model_path.is_none() {
            return Err(ConfigError::MissingModelPath);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("logwarden")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
