//! logwarden: streaming log anomaly detection.
//!
//! Raw log lines are reduced to log keys, held in a sliding window, scored by
//! a sequence model, and reported; an alert fires when enough keys in the
//! window look improbable.
//!
//! # Architecture
//!
//! ```text
//! Feed (file | stdin) ──► Pipeline ──► ReportSink (tracing | jsonl)
//!                            │
//!                            └──► Scorer (hash | transition)
//! ```
//!
//! The core stages live in `logwarden-core`, the line sources in
//! `logwarden-feeds`; this crate adds the CLI and re-exports both so
//! integration tests can import them from one place.

pub mod cli;
pub mod runner;

pub use logwarden_core::*;
pub use logwarden_feeds as feeds;
