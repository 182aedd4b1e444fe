//! Connection lifecycle states and the shared status cell.
//!
//! The state is written from three places: the connect sequence, the
//! engine (handshake accepted or refused), and the reader task (socket
//! closed). A `watch` channel lets all of them publish without locking
//! and lets anyone observe changes as they happen.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where a session is in its lifecycle.
///
/// ```text
///   Idle → StartingRelay → AwaitingRelayReady → SocketConnecting
///        → AwaitingGreeting → HandshakeSent → Connected
///
///   any state ──(failure, refusal, close, disconnect)──→ Disconnected
/// ```
///
/// When the relay is managed elsewhere the two relay states are skipped.
/// `Disconnected` is terminal: a new connection means a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    StartingRelay,
    AwaitingRelayReady,
    SocketConnecting,
    AwaitingGreeting,
    HandshakeSent,
    Connected,
    Disconnected,
}

impl SessionState {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Disconnected
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::StartingRelay => "starting relay",
            Self::AwaitingRelayReady => "waiting for relay",
            Self::SocketConnecting => "connecting",
            Self::AwaitingGreeting => "waiting for server",
            Self::HandshakeSent => "authenticating",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// A state plus the human-readable message that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub state: SessionState,
    pub message: String,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            message: "Not connected".to_string(),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.state, self.message)
    }
}

/// Shared, observable [`SessionStatus`].
///
/// Clones publish to the same channel.
#[derive(Debug, Clone)]
pub struct StatusCell {
    tx: Arc<watch::Sender<SessionStatus>>,
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusCell {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionStatus::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> SessionStatus {
        self.tx.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.tx.borrow().state
    }

    /// Publishes a new status. Once the cell is `Disconnected` it stays
    /// that way; later updates are dropped and `false` is returned.
    pub fn set(&self, state: SessionState, message: impl Into<String>) -> bool {
        let message = message.into();
        let changed = self.tx.send_if_modified(|status| {
            if status.state.is_terminal() {
                return false;
            }
            *status = SessionStatus {
                state,
                message: message.clone(),
            };
            true
        });
        if changed {
            tracing::debug!(%state, %message, "session status");
        } else {
            tracing::debug!(%state, "status update after disconnect ignored");
        }
        changed
    }

    /// Moves to `Disconnected` unless already there, so the first reason
    /// recorded is the one that sticks.
    pub fn close(&self, message: impl Into<String>) -> bool {
        let message = message.into();
        let changed = self.tx.send_if_modified(|status| {
            if status.state.is_terminal() {
                return false;
            }
            *status = SessionStatus {
                state: SessionState::Disconnected,
                message: message.clone(),
            };
            true
        });
        if changed {
            tracing::info!(%message, "session closed");
        }
        changed
    }

    /// A receiver that sees every later change.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.tx.subscribe()
    }
}
