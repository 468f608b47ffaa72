//! Replay: paces the lines of a log file onto a writer.
//!
//! Used to demo the stdin source: `logwarden replay app.log | logwarden run
//! --source stdin`. When the file is missing a short built-in sample is
//! replayed instead.

use crate::{file, LineStream};
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

pub const SAMPLE_LINES: &[&str] = &[
    "2025-09-04 10:15:30 INFO User 12345 logged in from 10.0.0.5",
    "2025-09-04 10:15:31 WARN Failed to open /var/tmp/cache file",
    "2025-09-04 10:15:32 ERROR Connection timeout after 50000 ms",
    "2025-09-04 10:15:33 INFO User 12345 requested /api/data",
];

/// Write each line of `path` to `out`, flushing after every line and waiting
/// `delay` before the next one. Stops early when `cancel` fires. Returns the
/// number of lines written.
pub async fn replay<W>(
    path: &Path,
    delay: Duration,
    mut out: W,
    cancel: &CancellationToken,
) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut source: LineStream = if file::is_regular_file(path).await {
        file::open(path, false).await
    } else {
        tracing::warn!(path = %path.display(), "replay file not found; using built-in sample");
        futures::stream::iter(SAMPLE_LINES.iter().map(|line| Ok(line.to_string()))).boxed()
    };

    let mut written = 0;
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            line = source.next() => line,
        };
        let Some(line) = next else { break };

        let line = line?;
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        written += 1;

        if !delay.is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
    Ok(written)
}
