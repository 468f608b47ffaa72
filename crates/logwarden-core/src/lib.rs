//! logwarden-core: streaming log anomaly detection.
//!
//! This crate exposes the detection pipeline stages as public modules, plus
//! the shared types that flow between them.
//!
//! # Architecture
//!
//! ```text
//! raw line ──► Normalizer ──► Window ──► Scorer ──► Detector ──► ReportSink
//!                                 ▲                                  │
//!                                 └──────────── Pipeline ────────────┘
//! ```
//!
//! The [`Pipeline`](pipeline::Pipeline) drives one stream on one task; each
//! stream owns its own window.

pub mod config;
pub mod detector;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod scorer;
pub mod types;
pub mod window;

pub use error::{ConfigError, DetectError, ScoringError};
pub use pipeline::{Pipeline, PipelineSettings, PipelineState};
pub use report::{Report, ReportSink, RunOutcome, RunSummary};
pub use scorer::Scorer;
pub use types::{Anomaly, LogKey, Severity};
pub use window::Window;
