//! Unified error type for honkbridge.

use honkbridge_protocol::ProtocolError;
use honkbridge_session::{SessionError, StoreError};
use honkbridge_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// Callers of the `honkbridge` facade deal with this one type; the
/// `#[from]` conversions let `?` lift sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum HonkbridgeError {
    /// Relay or socket failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Encoding or message-shape failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Session operation failure (not connected, refused, bad config).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Persisted-state failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A connection attempt ended without reaching the handshake.
    #[error("connection failed: {0}")]
    ConnectFailed(String),
}
