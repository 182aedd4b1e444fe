//! Client session for honkbridge.
//!
//! This crate turns relay lines into game events:
//!
//! 1. **Lifecycle** ([`Session`], [`SessionState`]): relay startup,
//!    loopback connect, greeting, handshake, and teardown
//! 2. **Dispatch** ([`Engine`]): catalog reassembly, batch splitting,
//!    and one handler per inbound command
//! 3. **Lookups** ([`Registries`], [`PlayerDirectory`]): ids to names,
//!    slots to players and games
//! 4. **Delivery** ([`DeliveryTracker`], [`SessionStore`]): each location
//!    reported once, each item applied once, across restarts
//! 5. **Callbacks** ([`SessionHooks`]): what the game integration sees
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade (above)  ← owns hooks and store, drives tick()
//!     ↕
//! Session Layer (this crate)  ← state machine and protocol handling
//!     ↕
//! Protocol Layer / Transport Layer (below)  ← messages, catalog, lines
//! ```

mod config;
mod delivery;
mod directory;
mod engine;
mod error;
mod hooks;
mod local_table;
mod log;
mod options;
mod registry;
mod session;
mod status;
mod store;
mod timers;

pub use config::{
    ConnectConfig, RelayConfig, RetryPolicy, TimerConfig, DEFAULT_SERVER_PORT, LOCAL_RELAY_PORT,
    RELAY_BINARY,
};
pub use delivery::{DeliveryTracker, DeltaOutcome};
pub use directory::PlayerDirectory;
pub use engine::Engine;
pub use error::{SessionError, StoreError};
pub use hooks::{ReceivedItem, SessionHooks};
pub use log::{LogCategory, LogEntry, LogRing, LOG_CAPACITY};
pub use options::SessionOptions;
pub use registry::{
    local_item_name, local_location_name, unknown_item, unknown_location, ItemKind, LocationKind,
    Registries, BASE_ID,
};
pub use session::Session;
pub use status::{SessionState, SessionStatus, StatusCell};
pub use store::{JsonFileStore, MemoryStore, PersistedState, SessionStore};
pub use timers::{ItemsWaitTimer, ResyncTimer};
