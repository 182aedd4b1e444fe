//! Wire protocol for honkbridge.
//!
//! This crate defines what travels over the relay socket and how to make
//! sense of it without a full JSON parser:
//!
//! - **Scan** ([`scan`]): quote-aware text utilities: completeness
//!   checks, matching delimiters, and key/value extraction.
//! - **Types** ([`ClientCommand`], [`ServerCommand`], [`Slot`], ...): the
//!   commands we send (serde-derived) and the tags we recognize.
//! - **Codec** ([`encode`], [`split_batch`]): line framing in both
//!   directions.
//! - **Messages** ([`message`]): the handful of inbound shapes the
//!   session acts on.
//! - **Catalog** ([`CatalogAssembler`], [`Catalog`], [`NameTable`]):
//!   reassembly and parsing of the possibly chunked name catalog.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw lines) and the
//! session (state and callbacks). It knows nothing about sockets or
//! timers.
//!
//! ```text
//! Transport (lines) → Protocol (commands, tables) → Session (state)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod catalog;
mod codec;
mod error;
pub mod message;
pub mod scan;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use catalog::{
    parse_catalog, Catalog, CatalogAssembler, CatalogReport, Feed, GameTables, NameTable,
};
pub use codec::{encode, encode_batch, split_batch};
pub use error::ProtocolError;
pub use types::{
    BounceData, ClientCommand, ItemId, LocationId, NetworkVersion, ServerCommand, Slot,
    CLIENT_GOAL_STATUS, COMPANION_FAILURE_TAG, DEFAULT_GAME, ITEMS_HANDLING_ALL,
};
