use clap::Parser;
use logwarden::cli::{Cli, Command};
use logwarden::runner;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if cli.debug { "debug" } else { "info" })
            }),
        )
        .init();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(dispatch(cli.command));
    // Blocking work that cannot be interrupted (a scorer past its timeout)
    // must not keep the process alive once the run has finished.
    runtime.shutdown_background();
    result
}

async fn dispatch(command: Command) -> anyhow::Result<ExitCode> {
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupted by user");
                cancel.cancel();
            }
        }
    });

    match command {
        Command::Run(args) => {
            let summary = runner::run(&args, cancel).await?;
            Ok(ExitCode::from(runner::exit_code(summary.outcome)))
        }
        Command::Replay(args) => {
            let cancelled = cancel.clone();
            runner::replay(&args, cancel).await?;
            Ok(ExitCode::from(if cancelled.is_cancelled() { 130 } else { 0 }))
        }
    }
}
