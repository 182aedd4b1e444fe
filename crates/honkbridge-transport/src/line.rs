//! Newline framing over any async byte stream.
//!
//! Every message on the relay socket is one UTF-8 line; bytes that are
//! not valid UTF-8 are replaced with U+FFFD rather than failing the
//! read. Reading and
//! writing are split so a pending read never holds up an outbound
//! message: the reader is driven by one background task, and all writes
//! funnel through an [`Outbox`] into a single writer task, which gives
//! callers on different threads a serialized stream for free.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::TransportError;

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Reads newline-terminated text lines.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            buf: Vec::with_capacity(8 * 1024),
        }
    }

    /// Reads one line, stripping the trailing `\n` and optional `\r`.
    ///
    /// Returns `Ok(None)` on clean EOF. A final unterminated line is still
    /// returned before EOF is reported.
    pub async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        self.buf.clear();
        let n = self
            .inner
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        if n == 0 {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&self.buf);
        if matches!(text, std::borrow::Cow::Owned(_)) {
            tracing::warn!(bytes = n, "line was not valid UTF-8, replaced bad bytes");
        }
        Ok(Some(text.trim_end_matches(['\n', '\r']).to_string()))
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Cloneable handle for queueing outbound lines.
///
/// Sending never blocks: the line is handed to the writer task, which
/// appends the newline and flushes.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<String>,
}

impl Outbox {
    /// Creates an outbox that is not attached to any socket.
    ///
    /// The receiver sees exactly what a writer task would write, minus the
    /// newline. Used for driving the protocol engine without a network.
    pub fn detached() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queues one line for sending.
    ///
    /// # Errors
    /// [`TransportError::ConnectionClosed`] if the writer task has stopped.
    pub fn send(&self, line: impl Into<String>) -> Result<(), TransportError> {
        self.tx
            .send(line.into())
            .map_err(|_| TransportError::ConnectionClosed("writer stopped".into()))
    }

    /// Returns `true` once the writer task has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// The write half of a line connection, before its task is started.
#[derive(Debug)]
pub struct LineWriter<W> {
    inner: W,
}

impl<W> LineWriter<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Starts the writer task and returns the handle used to feed it.
    ///
    /// The task ends when every [`Outbox`] clone is dropped, when a write
    /// fails, or when `shutdown` flips to `true`.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> (Outbox, JoinHandle<()>) {
        let (outbox, mut rx) = Outbox::detached();
        let mut inner = self.inner;

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                    next = rx.recv() => {
                        let Some(line) = next else { break };
                        if let Err(e) = write_line(&mut inner, &line).await {
                            tracing::warn!(error = %e, "outbound write failed, stopping writer");
                            break;
                        }
                        tracing::trace!(bytes = line.len(), "line sent");
                    }
                }
            }
            if let Err(error) = inner.shutdown().await {
                tracing::debug!(%error, "writer shutdown failed");
            }
            tracing::debug!("writer task stopped");
        });

        (outbox, handle)
    }
}

async fn write_line<W: AsyncWrite + Unpin>(w: &mut W, line: &str) -> Result<(), TransportError> {
    w.write_all(line.as_bytes())
        .await
        .map_err(TransportError::SendFailed)?;
    w.write_all(b"\n").await.map_err(TransportError::SendFailed)?;
    w.flush().await.map_err(TransportError::SendFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_reads_crlf_and_lf() {
        let (a, mut b) = tokio::io::duplex(64);
        tokio::spawn(async move {
            b.write_all(b"hello\r\nworld\nlast").await.unwrap();
        });

        let mut lr = LineReader::new(a);
        assert_eq!(lr.read_line().await.unwrap().as_deref(), Some("hello"));
        assert_eq!(lr.read_line().await.unwrap().as_deref(), Some("world"));
        assert_eq!(lr.read_line().await.unwrap().as_deref(), Some("last"));
        assert_eq!(lr.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced_not_fatal() {
        let (a, mut b) = tokio::io::duplex(64);
        tokio::spawn(async move {
            b.write_all(b"\xff\xfe\n[{\"cmd\":\"Sync\"}]\n").await.unwrap();
        });

        let mut lr = LineReader::new(a);
        assert_eq!(lr.read_line().await.unwrap().as_deref(), Some("\u{FFFD}\u{FFFD}"));
        assert_eq!(lr.read_line().await.unwrap().as_deref(), Some(r#"[{"cmd":"Sync"}]"#));
        assert_eq!(lr.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_writer_appends_newlines_in_order() {
        let (a, mut b) = tokio::io::duplex(256);
        let (_stop_tx, stop_rx) = watch::channel(false);
        let (outbox, handle) = LineWriter::new(a).spawn(stop_rx);

        outbox.send("[1]").unwrap();
        outbox.send("[2]").unwrap();
        drop(outbox);
        handle.await.unwrap();

        let mut out = String::new();
        b.read_to_string(&mut out).await.unwrap();
        assert_eq!(out, "[1]\n[2]\n");
    }

    #[tokio::test]
    async fn test_writer_stops_on_shutdown_signal() {
        let (a, _b) = tokio::io::duplex(64);
        let (stop_tx, stop_rx) = watch::channel(false);
        let (outbox, handle) = LineWriter::new(a).spawn(stop_rx);

        stop_tx.send_replace(true);
        handle.await.unwrap();
        assert!(outbox.send("late").is_err());
    }

    #[test]
    fn test_detached_outbox_delivers_to_receiver() {
        let (outbox, mut rx) = Outbox::detached();
        outbox.send("x").unwrap();
        assert_eq!(rx.try_recv().unwrap(), "x");
        drop(rx);
        assert!(outbox.is_closed());
    }
}
