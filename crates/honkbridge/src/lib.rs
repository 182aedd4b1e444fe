//! # Honkbridge
//!
//! Client for a multiworld randomizer server, for games that cannot speak
//! WebSocket themselves.
//!
//! A small relay program holds the real server connection; honkbridge
//! starts it, talks to it over a loopback socket one JSON line at a time,
//! and turns what comes back into calls on a [`SessionHooks`]
//! implementation: items received, text to show, a companion's failure.
//! Locations the player checks go the other way.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use honkbridge::prelude::*;
//!
//! struct Game;
//!
//! impl SessionHooks for Game {
//!     fn on_item_received(&mut self, item: &ReceivedItem) {
//!         println!("got {} from {}", item.item_name, item.sender);
//!     }
//! }
//!
//! # async fn run() -> Result<(), HonkbridgeError> {
//! let config = ConnectConfig::new("archipelago.gg", 38281, "Goose");
//! let store = JsonFileStore::open("honkbridge-state.json")?;
//! let mut client = Client::new(config, Game, store);
//! client.connect().await?;
//! client.run_until(tokio::signal::ctrl_c()).await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! - `honkbridge-transport`: relay process and line-framed socket
//! - `honkbridge-protocol`: commands, message shapes, name catalog
//! - `honkbridge-session`: state machine, registries, delivery, hooks
//! - `honkbridge-tick`: frame scheduler behind [`Client::run_until`]

mod client;
mod error;
mod logging;

pub use client::Client;
pub use error::HonkbridgeError;
pub use logging::{init_tracing, init_tracing_with};

pub use honkbridge_protocol as protocol;
pub use honkbridge_session as session;
pub use honkbridge_tick as tick;
pub use honkbridge_transport as transport;

/// Everything an integration usually needs.
pub mod prelude {
    pub use crate::{init_tracing, Client, HonkbridgeError};
    pub use honkbridge_protocol::message::NetworkItem;
    pub use honkbridge_protocol::{ItemId, LocationId, Slot};
    pub use honkbridge_session::{
        ConnectConfig, JsonFileStore, LogCategory, LogEntry, MemoryStore, ReceivedItem, RelayConfig,
        SessionHooks, SessionOptions, SessionState, SessionStatus, SessionStore,
    };
    pub use honkbridge_tick::TickConfig;
}
