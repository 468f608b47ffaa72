//! Wires configuration, scorer, source, and sink into a pipeline run.

use crate::cli::{OutputFormat, ReplayArgs, RunArgs};
use anyhow::Context;
use logwarden_core::config::Config;
use logwarden_core::report::{JsonLinesSink, ReportSink, TracingSink};
use logwarden_core::{scorer, Pipeline, PipelineSettings, RunOutcome, RunSummary};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Resolve the effective configuration: file and environment layers, then
/// flags, then validation.
pub fn resolve_config(args: &RunArgs) -> anyhow::Result<Config> {
    let mut cfg = Config::load(args.config.as_deref()).context("loading configuration")?;
    args.apply(&mut cfg);
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

/// Run the detection pipeline until the source is exhausted or `cancel` fires.
///
/// Configuration problems are returned before any input is read.
pub async fn run(args: &RunArgs, cancel: CancellationToken) -> anyhow::Result<RunSummary> {
    let cfg = resolve_config(args)?;
    let scorer = scorer::from_config(&cfg.scorer)?;
    let mut pipeline = Pipeline::new(PipelineSettings::from_config(&cfg), scorer)?;

    tracing::info!(
        window = cfg.window.size,
        threshold = cfg.detector.threshold,
        alert_min_count = cfg.detector.alert_min_count,
        source = %cfg.source.kind,
        scorer = %cfg.scorer.kind,
        "starting"
    );

    let source = logwarden_feeds::open(&cfg.source).await;
    let mut sink: Box<dyn ReportSink> = match args.format {
        OutputFormat::Text => Box::new(TracingSink),
        OutputFormat::Jsonl => Box::new(JsonLinesSink::new(std::io::stdout())),
    };

    Ok(pipeline.run(source, &cancel, sink.as_mut()).await)
}

pub async fn replay(args: &ReplayArgs, cancel: CancellationToken) -> anyhow::Result<u64> {
    let written = logwarden_feeds::replay::replay(
        &args.path,
        Duration::from_millis(args.delay_ms),
        tokio::io::stdout(),
        &cancel,
    )
    .await?;
    Ok(written)
}

/// Process exit status for a finished run: 130 when interrupted, as a shell
/// would report for SIGINT.
pub fn exit_code(outcome: RunOutcome) -> u8 {
    match outcome {
        RunOutcome::Exhausted => 0,
        RunOutcome::Cancelled => 130,
    }
}
