//! Transport layer for honkbridge.
//!
//! The remote coordination server is never reached directly. A local relay
//! process bridges its transport to a plain TCP socket on the loopback
//! interface, and everything this crate does sits on that socket:
//!
//! - **Relay** ([`locate_relay`], [`RelayProcess`]): finding, starting,
//!   and stopping the bridge program.
//! - **Lines** ([`LineReader`], [`LineWriter`], [`Outbox`]): newline
//!   framing. Reads happen on a single background task; writes are
//!   serialized through one writer task fed by a channel.
//! - **Connect** ([`TcpLineConnection::connect`]): bounded retries with a
//!   fixed backoff while the relay finishes starting.
//!
//! ```text
//! Relay (process) → TCP (loopback) → Lines (String) → Protocol
//! ```

mod error;
mod line;
mod relay;
mod tcp;

pub use error::TransportError;
pub use line::{LineReader, LineWriter, Outbox};
pub use relay::{locate_relay, RelayProcess};
pub use tcp::TcpLineConnection;

use std::fmt;

/// Opaque identifier for a connection, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}
