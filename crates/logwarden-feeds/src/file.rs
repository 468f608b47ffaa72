//! File source. A missing or unreadable path yields no lines rather than an
//! error, so the run still ends with a clean (empty) summary.

use crate::{empty, lines, LineStream};
use std::path::Path;
use tokio::io::BufReader;

/// `true` if `path` names a regular file.
pub async fn is_regular_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

/// Read `path` to completion, one item per line.
pub async fn open(path: &Path, skip_blank: bool) -> LineStream {
    if !is_regular_file(path).await {
        tracing::warn!(path = %path.display(), "log file not found; no input produced");
        return empty();
    }
    match tokio::fs::File::open(path).await {
        Ok(file) => lines(BufReader::new(file), skip_blank),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot open log file; no input produced");
            empty()
        }
    }
}
