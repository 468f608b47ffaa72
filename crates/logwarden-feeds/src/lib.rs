//! logwarden-feeds: line sources for the detection pipeline.
//!
//! Each source reads raw bytes and yields one decoded line per item: trailing
//! `\n` / `\r\n` removed, invalid UTF-8 replaced with `U+FFFD`. The pipeline
//! consumes every source the same way, as a [`LineStream`].

pub mod file;
pub mod replay;
pub mod stdin;

use futures::{Stream, StreamExt};
use logwarden_core::config::{SourceConfig, SourceKind};
use std::io;
use std::pin::Pin;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// A possibly infinite sequence of raw lines.
pub type LineStream = Pin<Box<dyn Stream<Item = io::Result<String>> + Send>>;

/// Open the source selected by `[source]`.
pub async fn open(cfg: &SourceConfig) -> LineStream {
    match (cfg.kind, cfg.path.as_deref()) {
        (SourceKind::Stdin, _) => {
            tracing::info!("reading input from stdin");
            stdin::open(cfg.skip_blank)
        }
        (SourceKind::File, Some(path)) => {
            tracing::info!(path = %path.display(), "reading input from file");
            file::open(path, cfg.skip_blank).await
        }
        (SourceKind::File, None) => {
            tracing::warn!("file source without a path; no input produced");
            empty()
        }
    }
}

/// A source that ends immediately.
pub fn empty() -> LineStream {
    futures::stream::empty().boxed()
}

/// Split `reader` into lines. A read error is yielded once and ends the
/// stream.
pub fn lines<R>(reader: R, skip_blank: bool) -> LineStream
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    futures::stream::unfold(Some(reader), |reader| async move {
        let mut reader = reader?;
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => None,
            Ok(_) => Some((Ok(decode_line(&buf)), Some(reader))),
            Err(e) => Some((Err(e), None)),
        }
    })
    .filter(move |item| futures::future::ready(keep(item, skip_blank)))
    .boxed()
}

fn keep(item: &io::Result<String>, skip_blank: bool) -> bool {
    !(skip_blank && matches!(item, Ok(line) if line.trim().is_empty()))
}

fn decode_line(buf: &[u8]) -> String {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    let buf = buf.strip_suffix(b"\r").unwrap_or(buf);
    String::from_utf8_lossy(buf).into_owned()
}
