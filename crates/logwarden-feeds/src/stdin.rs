//! Stdin source. Reads until the stream is closed.
//!
//! A blocking read on stdin cannot be interrupted, so it runs on its own OS
//! thread rather than the runtime's blocking pool. Dropping the stream stops
//! the thread after its current read; a read that never returns leaves the
//! thread parked without holding up runtime shutdown.

use crate::{decode_line, keep, LineStream};
use futures::StreamExt;
use std::io::{self, BufRead, BufReader, Read};
use tokio::sync::mpsc;

/// Lines buffered between the reader thread and the pipeline.
const CHANNEL_CAPACITY: usize = 64;

pub fn open(skip_blank: bool) -> LineStream {
    from_reader(io::stdin(), skip_blank)
}

/// Read `reader` line by line on a dedicated thread. Same decoding as
/// [`lines`](crate::lines).
pub fn from_reader<R>(reader: R, skip_blank: bool) -> LineStream
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let spawned = std::thread::Builder::new()
        .name("logwarden-stdin".to_string())
        .spawn(move || forward(BufReader::new(reader), skip_blank, tx));
    if let Err(e) = spawned {
        tracing::error!(error = %e, "cannot start input reader thread");
        return futures::stream::once(async move { Err(e) }).boxed();
    }

    futures::stream::unfold(rx, |mut rx| async move {
        let item = rx.recv().await?;
        Some((item, rx))
    })
    .boxed()
}

fn forward<R: BufRead>(mut reader: R, skip_blank: bool, tx: mpsc::Sender<io::Result<String>>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let item = match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => Ok(decode_line(&buf)),
            Err(e) => Err(e),
        };
        let failed = item.is_err();
        if keep(&item, skip_blank) && tx.blocking_send(item).is_err() {
            return;
        }
        if failed {
            return;
        }
    }
}
