//! Inbound message shapes.
//!
//! Each `parse_*` function takes the body of one command object (as
//! produced by [`crate::split_batch`]) and pulls out only the fields the
//! session needs. Optional fields that are missing or malformed degrade to
//! `None`/empty; only a missing field the message is meaningless without
//! produces a [`ProtocolError::InvalidMessage`].

use crate::scan::{
    find_matching_brace, object_entries, objects_in_array, strings_in_array, top_level_value,
    top_level_value_start, unescape,
};
use crate::{ItemId, LocationId, ProtocolError, Slot};

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// The server's greeting, sent before any handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomInfo {
    pub seed_name: Option<String>,
}

/// One entry of a `players` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub slot: Slot,
    pub name: Option<String>,
    pub alias: Option<String>,
    pub game: Option<String>,
}

impl PlayerRecord {
    /// The name to show: the alias when it is set, otherwise the name.
    pub fn display_name(&self) -> Option<&str> {
        self.alias
            .as_deref()
            .filter(|a| !a.is_empty())
            .or_else(|| self.name.as_deref().filter(|n| !n.is_empty()))
    }
}

/// One entry of the `slot_info` map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    pub slot: Slot,
    pub name: Option<String>,
    pub game: Option<String>,
}

/// The handshake acknowledgment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connected {
    pub slot: Option<Slot>,
    pub players: Vec<PlayerRecord>,
    pub slot_info: Vec<SlotInfo>,
    /// Raw text of the `slot_data` object, braces included.
    pub slot_data: Option<String>,
}

/// An item as delivered to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkItem {
    pub item: ItemId,
    /// Where the item was found.
    pub location: LocationId,
    /// The slot whose world the location belongs to.
    pub player: Slot,
    pub flags: u32,
}

/// An item delta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceivedItems {
    /// Index of the first item in this delta.
    pub index: u64,
    /// Each item paired with its absolute index (`index + position`).
    pub items: Vec<(u64, NetworkItem)>,
}

/// How a [`TextPart`] should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// Literal text (including parts the server already resolved).
    Text,
    /// `text` is a slot number.
    PlayerId,
    /// `text` is an item id, owned by `player`'s world when set.
    ItemId,
    /// `text` is a location id, in `player`'s world when set.
    LocationId,
}

/// One fragment of a structured text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPart {
    pub kind: PartKind,
    pub text: String,
    pub player: Option<Slot>,
}

/// A structured text message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintJson {
    /// The message's top-level `type`, when present.
    pub kind: Option<String>,
    pub parts: Vec<TextPart>,
}

/// A broadcast relayed to us by tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bounced {
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub cause: Option<String>,
}

impl Bounced {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// The server's refusal of our handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionRefused {
    pub errors: Vec<String>,
}

/// Room state changes after the handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomUpdate {
    /// Present only when player names changed.
    pub players: Option<Vec<PlayerRecord>>,
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn string_field(obj: &str, key: &str) -> Option<String> {
    let start = top_level_value_start(obj, key)?;
    if obj.as_bytes().get(start) != Some(&b'"') {
        return None;
    }
    top_level_value(obj, key).map(|raw| unescape(raw).into_owned())
}

fn number_field<T: std::str::FromStr>(obj: &str, key: &str) -> Option<T> {
    let start = top_level_value_start(obj, key)?;
    let raw = crate::scan::value_at(obj, start)?;
    // Some servers send slot numbers as strings; accept both.
    raw.parse().ok()
}

/// The text of the array under `key`, or `None` if `key` is not an array.
fn array_start(obj: &str, key: &str) -> Option<usize> {
    let start = top_level_value_start(obj, key)?;
    (obj.as_bytes().get(start) == Some(&b'[')).then_some(start)
}

fn object_text<'a>(obj: &'a str, key: &str) -> Option<&'a str> {
    let start = top_level_value_start(obj, key)?;
    if obj.as_bytes().get(start) != Some(&b'{') {
        return None;
    }
    let end = find_matching_brace(obj, start)?;
    Some(&obj[start..=end])
}

fn player_records(obj: &str, key: &str) -> Option<Vec<PlayerRecord>> {
    let open = array_start(obj, key)?;
    let records = objects_in_array(obj, open)
        .into_iter()
        .filter_map(|entry| {
            let slot = number_field::<u32>(entry, "slot")?;
            Some(PlayerRecord {
                slot: Slot(slot),
                name: string_field(entry, "name"),
                alias: string_field(entry, "alias"),
                game: string_field(entry, "game"),
            })
        })
        .collect();
    Some(records)
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

pub fn parse_room_info(body: &str) -> RoomInfo {
    RoomInfo {
        seed_name: string_field(body, "seed_name"),
    }
}

/// Parses the handshake acknowledgment.
///
/// Nothing here is strictly required: a reply without `players` yields an
/// empty directory and one without `slot_data` yields default options.
pub fn parse_connected(body: &str) -> Connected {
    let slot_info = object_text(body, "slot_info")
        .map(|info| {
            object_entries(info, 0)
                .into_iter()
                .filter_map(|(key, value)| {
                    let slot = match key.parse::<u32>() {
                        Ok(slot) => slot,
                        Err(_) => {
                            tracing::warn!(key, "slot_info key is not a slot number");
                            return None;
                        }
                    };
                    value.starts_with('{').then(|| SlotInfo {
                        slot: Slot(slot),
                        name: string_field(value, "name"),
                        game: string_field(value, "game"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Connected {
        slot: number_field(body, "slot").map(Slot),
        players: player_records(body, "players").unwrap_or_default(),
        slot_info,
        slot_data: object_text(body, "slot_data").map(str::to_string),
    }
}

/// Parses an item delta.
///
/// Every element of `items` keeps its array position for indexing, even
/// one that is skipped as malformed, so a bad element never shifts the
/// indices of the items after it.
///
/// # Errors
/// [`ProtocolError::InvalidMessage`] when `index` is missing.
pub fn parse_received_items(body: &str) -> Result<ReceivedItems, ProtocolError> {
    let index: u64 = number_field(body, "index")
        .ok_or_else(|| ProtocolError::InvalidMessage("ReceivedItems without index".into()))?;

    let Some(open) = array_start(body, "items") else {
        return Ok(ReceivedItems {
            index,
            items: Vec::new(),
        });
    };

    let mut items = Vec::new();
    for (position, entry) in objects_in_array(body, open).into_iter().enumerate() {
        let Some(item) = number_field::<i64>(entry, "item") else {
            tracing::warn!(position, "received item without an item id, skipping");
            continue;
        };
        let item_index = u64::try_from(position)
            .ok()
            .and_then(|p| index.checked_add(p));
        let Some(item_index) = item_index else {
            tracing::warn!(index, position, "received item index overflows, skipping");
            continue;
        };
        items.push((
            item_index,
            NetworkItem {
                item: ItemId(item),
                location: LocationId(number_field(entry, "location").unwrap_or_default()),
                player: Slot(number_field(entry, "player").unwrap_or_default()),
                flags: number_field(entry, "flags").unwrap_or_default(),
            },
        ));
    }

    Ok(ReceivedItems { index, items })
}

/// Parses a structured text message.
pub fn parse_print_json(body: &str) -> PrintJson {
    let parts = array_start(body, "data")
        .map(|open| {
            objects_in_array(body, open)
                .into_iter()
                .map(|part| {
                    let kind = match top_level_value(part, "type") {
                        Some("player_id") => PartKind::PlayerId,
                        Some("item_id") => PartKind::ItemId,
                        Some("location_id") => PartKind::LocationId,
                        _ => PartKind::Text,
                    };
                    TextPart {
                        kind,
                        text: string_field(part, "text").unwrap_or_default(),
                        player: number_field(part, "player").map(Slot),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    PrintJson {
        kind: string_field(body, "type"),
        parts,
    }
}

pub fn parse_bounced(body: &str) -> Bounced {
    let data = object_text(body, "data");
    Bounced {
        tags: array_start(body, "tags")
            .map(|open| strings_in_array(body, open))
            .unwrap_or_default(),
        source: data.and_then(|d| string_field(d, "source")),
        cause: data.and_then(|d| string_field(d, "cause")),
    }
}

pub fn parse_connection_refused(body: &str) -> ConnectionRefused {
    ConnectionRefused {
        errors: array_start(body, "errors")
            .map(|open| strings_in_array(body, open))
            .unwrap_or_default(),
    }
}

pub fn parse_room_update(body: &str) -> RoomUpdate {
    RoomUpdate {
        players: player_records(body, "players"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connected_full() {
        let body = r#"{"cmd":"Connected","team":0,"slot":2,
            "players":[{"team":0,"slot":1,"alias":"Ava","name":"ava_1","class":"NetworkPlayer"},
                       {"team":0,"slot":2,"alias":"","name":"Goose"}],
            "slot_data":{"include_npc_souls":0,"include_prop_souls":true},
            "slot_info":{"1":{"name":"ava_1","game":"Game A","type":1},
                         "2":{"name":"Goose","game":"Untitled Goose Game","type":1}}}"#;

        let connected = parse_connected(body);
        assert_eq!(connected.slot, Some(Slot(2)));
        assert_eq!(connected.players.len(), 2);
        assert_eq!(connected.players[0].display_name(), Some("Ava"));
        assert_eq!(connected.players[1].display_name(), Some("Goose"));
        assert_eq!(connected.slot_info.len(), 2);
        assert_eq!(connected.slot_info[0].game.as_deref(), Some("Game A"));
        assert_eq!(
            connected.slot_data.as_deref(),
            Some(r#"{"include_npc_souls":0,"include_prop_souls":true}"#)
        );
    }

    #[test]
    fn test_parse_connected_minimal() {
        let connected = parse_connected(r#"{"cmd":"Connected","slot":1}"#);
        assert_eq!(connected.slot, Some(Slot(1)));
        assert!(connected.players.is_empty());
        assert!(connected.slot_info.is_empty());
        assert!(connected.slot_data.is_none());
    }

    #[test]
    fn test_parse_received_items_assigns_absolute_indices() {
        let body = r#"{"cmd":"ReceivedItems","index":5,"items":[
            {"item":119000100,"location":-1,"player":0,"flags":1,"class":"NetworkItem"},
            {"location":3},
            {"item":119000200,"location":119001001,"player":2,"flags":0}]}"#;

        let delta = parse_received_items(body).unwrap();
        assert_eq!(delta.index, 5);
        assert_eq!(delta.items.len(), 2);
        assert_eq!(delta.items[0].0, 5);
        assert_eq!(delta.items[0].1.item, ItemId(119_000_100));
        assert_eq!(delta.items[0].1.location, LocationId(-1));
        assert_eq!(delta.items[1].0, 7);
        assert_eq!(delta.items[1].1.player, Slot(2));
    }

    #[test]
    fn test_parse_received_items_skips_overflowing_index() {
        let body = format!(
            r#"{{"cmd":"ReceivedItems","index":{},"items":[{{"item":1}},{{"item":2}}]}}"#,
            u64::MAX
        );

        let delta = parse_received_items(&body).unwrap();
        assert_eq!(delta.items.len(), 1);
        assert_eq!(delta.items[0].0, u64::MAX);
        assert_eq!(delta.items[0].1.item, ItemId(1));
    }

    #[test]
    fn test_parse_received_items_requires_index() {
        let err = parse_received_items(r#"{"cmd":"ReceivedItems","items":[]}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidMessage(_)));
    }

    #[test]
    fn test_parse_print_json_parts() {
        let body = r#"{"cmd":"PrintJSON","type":"ItemSend","receiving":1,
            "data":[{"text":"2","type":"player_id"},{"text":" sent "},
                    {"text":"119000100","type":"item_id","player":1,"flags":1},
                    {"text":" \"quoted\""}],
            "item":{"item":1,"location":2,"player":2,"flags":1}}"#;

        let msg = parse_print_json(body);
        assert_eq!(msg.kind.as_deref(), Some("ItemSend"));
        assert_eq!(msg.parts.len(), 4);
        assert_eq!(msg.parts[0].kind, PartKind::PlayerId);
        assert_eq!(msg.parts[1].kind, PartKind::Text);
        assert_eq!(msg.parts[2].kind, PartKind::ItemId);
        assert_eq!(msg.parts[2].player, Some(Slot(1)));
        assert_eq!(msg.parts[3].text, " \"quoted\"");
    }

    #[test]
    fn test_parse_bounced() {
        let body = r#"{"cmd":"Bounced","tags":["DeathLink"],"data":{"time":1.5,"source":"Ava","cause":"fell"}}"#;
        let bounced = parse_bounced(body);
        assert!(bounced.has_tag("DeathLink"));
        assert_eq!(bounced.source.as_deref(), Some("Ava"));
        assert_eq!(bounced.cause.as_deref(), Some("fell"));
    }

    #[test]
    fn test_parse_connection_refused_and_room_update() {
        let refused = parse_connection_refused(
            r#"{"cmd":"ConnectionRefused","errors":["InvalidSlot","InvalidPassword"]}"#,
        );
        assert_eq!(refused.errors, vec!["InvalidSlot", "InvalidPassword"]);

        let update = parse_room_update(r#"{"cmd":"RoomUpdate","hint_points":3}"#);
        assert!(update.players.is_none());
        let update = parse_room_update(
            r#"{"cmd":"RoomUpdate","players":[{"slot":1,"alias":"Ava2","name":"ava"}]}"#,
        );
        assert_eq!(update.players.unwrap()[0].display_name(), Some("Ava2"));
    }

    #[test]
    fn test_parse_room_info() {
        assert_eq!(
            parse_room_info(r#"{"cmd":"RoomInfo","seed_name":"1234"}"#).seed_name.as_deref(),
            Some("1234")
        );
    }
}
