use std::path::PathBuf;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// None of the configured search paths holds the relay binary.
    #[error("relay binary not found (searched {} path(s))", searched.len())]
    RelayNotFound {
        /// Every path that was checked, in search order.
        searched: Vec<PathBuf>,
    },

    /// The relay binary exists but could not be started.
    #[error("failed to start relay {path}: {source}")]
    RelaySpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The relay process exited before the socket was opened.
    #[error("relay exited immediately ({0})")]
    RelayExited(String),

    /// Every loopback connection attempt failed.
    #[error("could not reach relay after {attempts} attempt(s): {source}")]
    ConnectFailed {
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    /// The connection was closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
