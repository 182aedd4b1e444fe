//! Wire types for the randomizer protocol.
//!
//! Outbound commands are ordinary serde types: the set is small and fixed,
//! and deriving `Serialize` guarantees the JSON we send is well formed.
//! Inbound messages are a different story (see [`crate::message`]): they
//! can be large, arrive in pieces, or carry fields we never look at, so
//! they are only *classified* here by their command tag.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Game identifier sent in the handshake unless configured otherwise.
pub const DEFAULT_GAME: &str = "Untitled Goose Game";

/// Bounce tag for the cooperative "one dies, everyone dies" feature.
pub const COMPANION_FAILURE_TAG: &str = "DeathLink";

/// `items_handling` bitmask asking for every category of item
/// notification: items from other worlds, our own world, and our
/// starting inventory.
pub const ITEMS_HANDLING_ALL: u8 = 0b111;

/// Client status code the server understands as "goal completed".
pub const CLIENT_GOAL_STATUS: u8 = 30;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A participant's slot number in the multiworld.
///
/// Slot numbers are small but not guaranteed to be contiguous or to start
/// at zero, which is why lookups keyed by slot always have a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(pub u32);

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A network-wide item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A network-wide location id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub i64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Outbound commands
// ---------------------------------------------------------------------------

/// Protocol version announced in the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    /// Always `"Version"`; the server uses it to pick a deserializer.
    pub class: String,
}

impl Default for NetworkVersion {
    fn default() -> Self {
        Self {
            major: 0,
            minor: 5,
            build: 1,
            class: "Version".to_string(),
        }
    }
}

/// Payload of a companion-failure bounce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BounceData {
    /// Seconds since the Unix epoch.
    pub time: f64,
    /// Slot name of the player who failed.
    pub source: String,
    pub cause: String,
}

/// Every command this client sends.
///
/// `#[serde(tag = "cmd")]` puts the variant name inside the object, so
/// `ClientCommand::Sync` becomes `{"cmd":"Sync"}`. The server expects each
/// line to be an *array* of such objects; [`crate::encode`] adds that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum ClientCommand {
    /// The handshake.
    Connect {
        game: String,
        name: String,
        /// Sent empty; the server does not need a stable client id.
        uuid: String,
        version: NetworkVersion,
        tags: Vec<String>,
        /// `null` on the wire when the room has no password.
        password: Option<String>,
        items_handling: u8,
        /// Ask the server to include our slot's options block.
        slot_data: bool,
    },

    /// Reports completed locations.
    LocationChecks { locations: Vec<LocationId> },

    /// Reports a client status change.
    StatusUpdate { status: u8 },

    /// Requests the name catalog for every game in the room.
    GetDataPackage,

    /// Requests a full resend of received items.
    Sync,

    /// Broadcasts a payload to every client sharing one of `tags`.
    Bounce { tags: Vec<String>, data: BounceData },
}

impl ClientCommand {
    /// Builds the handshake for `name` in `game`.
    ///
    /// The companion-failure tag is advertised only when the feature is on;
    /// otherwise `tags` is an empty array.
    pub fn connect(
        game: &str,
        name: &str,
        password: Option<&str>,
        companion_failure: bool,
    ) -> Self {
        let tags = if companion_failure {
            vec![COMPANION_FAILURE_TAG.to_string()]
        } else {
            Vec::new()
        };
        Self::Connect {
            game: game.to_string(),
            name: name.to_string(),
            uuid: String::new(),
            version: NetworkVersion::default(),
            tags,
            password: password.filter(|p| !p.is_empty()).map(str::to_string),
            items_handling: ITEMS_HANDLING_ALL,
            slot_data: true,
        }
    }

    /// A check for exactly one location.
    pub fn location_check(location: LocationId) -> Self {
        Self::LocationChecks {
            locations: vec![location],
        }
    }

    /// The "goal completed" status update.
    pub fn goal_complete() -> Self {
        Self::StatusUpdate {
            status: CLIENT_GOAL_STATUS,
        }
    }

    /// A companion-failure broadcast from `source`.
    pub fn companion_failure(source: &str, cause: &str, time: f64) -> Self {
        Self::Bounce {
            tags: vec![COMPANION_FAILURE_TAG.to_string()],
            data: BounceData {
                time,
                source: source.to_string(),
                cause: cause.to_string(),
            },
        }
    }

    /// The wire tag of this command, for logging.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "Connect",
            Self::LocationChecks { .. } => "LocationChecks",
            Self::StatusUpdate { .. } => "StatusUpdate",
            Self::GetDataPackage => "GetDataPackage",
            Self::Sync => "Sync",
            Self::Bounce { .. } => "Bounce",
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound classification
// ---------------------------------------------------------------------------

/// The command tag of an inbound message.
///
/// Unknown tags are kept as [`ServerCommand::Other`] so they can be logged
/// and ignored rather than treated as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCommand {
    RoomInfo,
    Connected,
    ConnectionRefused,
    ReceivedItems,
    DataPackage,
    PrintJson,
    Bounced,
    RoomUpdate,
    Other(String),
}

impl ServerCommand {
    /// Maps a raw `cmd` value to a command.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "RoomInfo" => Self::RoomInfo,
            "Connected" => Self::Connected,
            "ConnectionRefused" => Self::ConnectionRefused,
            "ReceivedItems" => Self::ReceivedItems,
            "DataPackage" => Self::DataPackage,
            "PrintJSON" => Self::PrintJson,
            "Bounced" => Self::Bounced,
            "RoomUpdate" => Self::RoomUpdate,
            other => Self::Other(other.to_string()),
        }
    }

    /// Classifies one message object by its top-level `cmd` field.
    ///
    /// Returns `None` when the object has no `cmd` at all.
    pub fn classify(body: &str) -> Option<Self> {
        crate::scan::top_level_value(body, "cmd").map(Self::from_tag)
    }

    /// The wire tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::RoomInfo => "RoomInfo",
            Self::Connected => "Connected",
            Self::ConnectionRefused => "ConnectionRefused",
            Self::ReceivedItems => "ReceivedItems",
            Self::DataPackage => "DataPackage",
            Self::PrintJson => "PrintJSON",
            Self::Bounced => "Bounced",
            Self::RoomUpdate => "RoomUpdate",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ServerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connect_without_companion_failure_or_password() {
        let cmd = ClientCommand::connect(DEFAULT_GAME, "Goose", None, false);
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            value,
            json!({
                "cmd": "Connect",
                "game": "Untitled Goose Game",
                "name": "Goose",
                "uuid": "",
                "version": {"major": 0, "minor": 5, "build": 1, "class": "Version"},
                "tags": [],
                "password": null,
                "items_handling": 7,
                "slot_data": true
            })
        );
    }

    #[test]
    fn test_connect_with_companion_failure_and_password() {
        let cmd = ClientCommand::connect("Game", "Goose", Some("hunter2"), true);
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["tags"], json!(["DeathLink"]));
        assert_eq!(value["password"], json!("hunter2"));
    }

    #[test]
    fn test_empty_password_is_sent_as_null() {
        let cmd = ClientCommand::connect("Game", "Goose", Some(""), false);
        let value = serde_json::to_value(&cmd).unwrap();
        assert!(value["password"].is_null());
    }

    #[test]
    fn test_unit_commands_carry_only_the_tag() {
        assert_eq!(
            serde_json::to_string(&ClientCommand::Sync).unwrap(),
            r#"{"cmd":"Sync"}"#
        );
        assert_eq!(
            serde_json::to_string(&ClientCommand::GetDataPackage).unwrap(),
            r#"{"cmd":"GetDataPackage"}"#
        );
    }

    #[test]
    fn test_location_check_and_goal() {
        let check =
            serde_json::to_string(&ClientCommand::location_check(LocationId(119_000_042))).unwrap();
        assert_eq!(check, r#"{"cmd":"LocationChecks","locations":[119000042]}"#);

        let goal = serde_json::to_string(&ClientCommand::goal_complete()).unwrap();
        assert_eq!(goal, r#"{"cmd":"StatusUpdate","status":30}"#);
    }

    #[test]
    fn test_companion_failure_bounce() {
        let cmd = ClientCommand::companion_failure("Goose", "honked too hard", 12.5);
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["cmd"], "Bounce");
        assert_eq!(value["tags"], json!(["DeathLink"]));
        assert_eq!(value["data"]["source"], "Goose");
        assert_eq!(value["data"]["cause"], "honked too hard");
        assert_eq!(cmd.tag(), "Bounce");
    }

    #[test]
    fn test_classify_uses_top_level_cmd() {
        assert_eq!(
            ServerCommand::classify(r#"{"cmd":"PrintJSON","data":[{"cmd":"x"}]}"#),
            Some(ServerCommand::PrintJson)
        );
        assert_eq!(
            ServerCommand::classify(r#"{"cmd":"SetReply"}"#),
            Some(ServerCommand::Other("SetReply".into()))
        );
        assert_eq!(ServerCommand::classify(r#"{"slot":1}"#), None);
    }

    #[test]
    fn test_server_command_display_round_trips_tag() {
        for tag in ["RoomInfo", "Connected", "PrintJSON", "Bounced", "Retrieved"] {
            assert_eq!(ServerCommand::from_tag(tag).to_string(), tag);
        }
    }
}
