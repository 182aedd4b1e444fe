//! Error types for the protocol layer.
//!
//! Inbound parsing is deliberately forgiving: most shapes degrade to a
//! default instead of failing. The variants here cover the few places
//! where a caller has to know that something was dropped.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing an outbound command failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The message is invalid at the protocol level.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// One game's section of the name catalog could not be parsed.
    ///
    /// The section is skipped as a whole; the rest of the catalog is
    /// unaffected.
    #[error("malformed catalog section: {0}")]
    MalformedCatalog(String),
}
