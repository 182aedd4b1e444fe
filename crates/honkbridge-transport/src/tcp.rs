//! Loopback TCP connection to the relay.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::{ConnectionId, LineReader, LineWriter, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// A connected socket, already split into its line reader and writer.
#[derive(Debug)]
pub struct TcpLineConnection {
    id: ConnectionId,
    peer: SocketAddr,
    reader: LineReader<OwnedReadHalf>,
    writer: LineWriter<OwnedWriteHalf>,
}

impl TcpLineConnection {
    /// Connects to `addr`, retrying with a fixed `backoff` between tries.
    ///
    /// The relay needs a moment to open its listening port after it is
    /// spawned, so refusals are expected for the first attempt or two.
    /// `attempts` is clamped to at least one.
    ///
    /// # Errors
    /// [`TransportError::ConnectFailed`] carrying the last I/O error once
    /// every attempt has failed.
    pub async fn connect(
        addr: SocketAddr,
        attempts: u32,
        backoff: Duration,
    ) -> Result<Self, TransportError> {
        let attempts = attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match TcpStream::connect(addr).await {
                Ok(stream) => {
                    if let Err(error) = stream.set_nodelay(true) {
                        tracing::debug!(%error, "could not disable Nagle on relay socket");
                    }
                    let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
                    tracing::info!(%id, %addr, attempt, "connected to relay");

                    let (read, write) = stream.into_split();
                    return Ok(Self {
                        id,
                        peer: addr,
                        reader: LineReader::new(read),
                        writer: LineWriter::new(write),
                    });
                }
                Err(e) if attempt < attempts => {
                    tracing::debug!(
                        %addr,
                        attempt,
                        error = %e,
                        "relay not reachable yet, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(source) => {
                    tracing::warn!(%addr, attempts, error = %source, "giving up on relay");
                    return Err(TransportError::ConnectFailed { attempts, source });
                }
            }
        }
    }

    /// Returns the unique identifier for this connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Address of the relay end of the socket.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Splits into the reader (for the background task) and the writer.
    ///
    /// The socket closes once both halves are dropped.
    pub fn into_parts(self) -> (LineReader<OwnedReadHalf>, LineWriter<OwnedWriteHalf>) {
        (self.reader, self.writer)
    }
}
