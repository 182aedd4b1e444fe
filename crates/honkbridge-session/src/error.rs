//! Error types for the session layer.

use std::path::PathBuf;

use honkbridge_protocol::ProtocolError;
use honkbridge_transport::TransportError;

/// Errors from loading or saving persisted session state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not valid JSON for the persisted state.
    #[error("store format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Errors that can occur during session operations.
///
/// Only setup and caller errors surface here. Problems with individual
/// inbound messages are logged and absorbed so that one bad message never
/// stops the ones behind it.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Relay or socket failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An outbound command could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The operation needs an acknowledged handshake.
    #[error("session is not connected")]
    NotConnected,

    /// The configuration cannot be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A configuration file could not be read.
    #[error("cannot read configuration {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for [`crate::ConnectConfig`].
    #[error("invalid configuration file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
