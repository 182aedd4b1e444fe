//! The name catalog: reassembly and parsing.
//!
//! The server answers a catalog request with one `DataPackage` message
//! holding, for every game in the room, two maps from symbolic name to
//! numeric id:
//!
//! ```text
//! [{"cmd":"DataPackage","data":{"games":{
//!     "Game A": {"item_name_to_id":{"Sword":1,...},
//!                "location_name_to_id":{"Chest":10,...}, ...},
//!     "Game B": {...}}}}]
//! ```
//!
//! That message can be large enough that the relay hands it over in
//! several lines. [`CatalogAssembler`] glues the pieces back together and
//! parses the result once it is balanced; the parser itself only looks for
//! the two table markers and never builds a full JSON tree.

use std::collections::{BTreeMap, HashMap};

use crate::ProtocolError;
use crate::scan::{
    command_tags, find_matching_brace, is_complete_message, numeric_len, skip_ws, string_end,
    unescape, StringMask,
};

const ITEM_MARKER: &str = "\"item_name_to_id\"";
const LOCATION_MARKER: &str = "\"location_name_to_id\"";

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Id ↔ name mapping for one namespace of one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    by_id: HashMap<i64, String>,
    by_name: HashMap<String, i64>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping. A later entry for the same id replaces the earlier.
    pub fn insert(&mut self, id: i64, name: impl Into<String>) {
        let name = name.into();
        self.by_name.insert(name.clone(), id);
        self.by_id.insert(id, name);
    }

    pub fn name(&self, id: i64) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub fn id(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Both tables of one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameTables {
    pub items: NameTable,
    pub locations: NameTable,
}

/// Every game's tables, keyed by game name.
///
/// A `BTreeMap` keeps iteration in name order, so a lookup that has to
/// scan several games always answers the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    games: BTreeMap<String, GameTables>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, game: &str) -> bool {
        self.games.contains_key(game)
    }

    pub fn game(&self, game: &str) -> Option<&GameTables> {
        self.games.get(game)
    }

    /// Registers a game. Returns `false` (and keeps the existing tables)
    /// if the game is already present.
    pub fn insert(&mut self, game: impl Into<String>, tables: GameTables) -> bool {
        match self.games.entry(game.into()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(tables);
                true
            }
        }
    }

    /// Games in name order.
    pub fn games(&self) -> impl Iterator<Item = (&str, &GameTables)> {
        self.games.iter().map(|(name, tables)| (name.as_str(), tables))
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// What one parse added to a [`Catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogReport {
    pub games_added: usize,
    /// Sections for games that were already registered.
    pub games_skipped: usize,
    /// Sections that could not be parsed and were dropped whole.
    pub games_failed: usize,
    pub items: usize,
    pub locations: usize,
}

/// Parses every game section in `text` into `catalog`.
///
/// For each item-table marker the owning game is found by walking
/// backwards to the enclosing object and reading the key in front of it.
/// The item table and the location table of that same object are parsed
/// into fresh tables, and the game is registered only if both parse, so
/// no half-filled game is ever visible.
pub fn parse_catalog(text: &str, catalog: &mut Catalog) -> CatalogReport {
    let mask = StringMask::new(text);
    let mut report = CatalogReport::default();
    let mut from = 0;

    while let Some(rel) = text[from..].find(ITEM_MARKER) {
        let marker = from + rel;
        from = marker + ITEM_MARKER.len();

        // The marker text inside some other string is not a key.
        if !mask.starts_string(marker) {
            continue;
        }
        let Some(items_start) = value_after_key(text, marker + ITEM_MARKER.len()) else {
            continue;
        };

        let Some(game_open) = mask.enclosing_brace(text, marker) else {
            tracing::warn!(offset = marker, "item table outside of any object, skipping");
            report.games_failed += 1;
            continue;
        };
        let Some((key_start, key_end)) = mask.key_before(text, game_open) else {
            tracing::warn!(offset = marker, "item table without an owning game, skipping");
            report.games_failed += 1;
            continue;
        };
        let game = unescape(&text[key_start..key_end]).into_owned();
        let game_close = find_matching_brace(text, game_open);

        if catalog.contains(&game) {
            tracing::debug!(%game, "catalog section for known game ignored");
            report.games_skipped += 1;
        } else {
            match parse_game(text, &mask, game_open, game_close, items_start) {
                Ok(tables) => {
                    report.games_added += 1;
                    report.items += tables.items.len();
                    report.locations += tables.locations.len();
                    tracing::debug!(
                        %game,
                        items = tables.items.len(),
                        locations = tables.locations.len(),
                        "catalog section loaded"
                    );
                    catalog.insert(game, tables);
                }
                Err(error) => {
                    tracing::warn!(%game, %error, "skipping catalog section");
                    report.games_failed += 1;
                }
            }
        }

        if let Some(close) = game_close {
            from = from.max(close + 1);
        }
    }

    report
}

/// Given the index just past a key's closing quote, returns where its
/// value starts, or `None` if no colon follows (the text was a value).
fn value_after_key(text: &str, after_key: usize) -> Option<usize> {
    let colon = skip_ws(text, after_key);
    (text.as_bytes().get(colon) == Some(&b':')).then(|| skip_ws(text, colon + 1))
}

fn parse_game(
    text: &str,
    mask: &StringMask,
    game_open: usize,
    game_close: Option<usize>,
    items_start: usize,
) -> Result<GameTables, ProtocolError> {
    let game_close = game_close
        .ok_or_else(|| ProtocolError::MalformedCatalog("game object is not closed".into()))?;

    let items = parse_table(text, items_start)?;

    // The location table may sit before or after the item table; any
    // location marker that is a direct key of this game's object counts.
    let mut locations = NameTable::new();
    let mut from = game_open;
    while let Some(rel) = text[from..game_close].find(LOCATION_MARKER) {
        let marker = from + rel;
        from = marker + LOCATION_MARKER.len();
        if !mask.starts_string(marker) || mask.enclosing_brace(text, marker) != Some(game_open) {
            continue;
        }
        if let Some(start) = value_after_key(text, from) {
            locations = parse_table(text, start)?;
            break;
        }
    }

    Ok(GameTables { items, locations })
}

/// Parses a `{"name": id, ...}` object starting at `open`.
fn parse_table(text: &str, open: usize) -> Result<NameTable, ProtocolError> {
    if text.as_bytes().get(open) != Some(&b'{') {
        return Err(ProtocolError::MalformedCatalog(format!(
            "expected a table at offset {open}"
        )));
    }
    let close = find_matching_brace(text, open)
        .ok_or_else(|| ProtocolError::MalformedCatalog("table is not closed".into()))?;

    let bytes = text.as_bytes();
    let mut table = NameTable::new();
    let mut i = open + 1;

    loop {
        i = skip_ws(text, i);
        if i >= close {
            break;
        }
        match bytes[i] {
            b',' => {
                i += 1;
                continue;
            }
            b'"' => {}
            other => {
                return Err(ProtocolError::MalformedCatalog(format!(
                    "unexpected {:?} at offset {i}",
                    other as char
                )));
            }
        }

        let key_end = string_end(text, i)
            .filter(|end| *end < close)
            .ok_or_else(|| ProtocolError::MalformedCatalog("unterminated name".into()))?;
        let name = unescape(&text[i + 1..key_end]);

        let value = value_after_key(text, key_end + 1)
            .ok_or_else(|| ProtocolError::MalformedCatalog(format!("no value for {name:?}")))?;
        let len = numeric_len(&text[value..close]);
        let id: i64 = text[value..value + len].parse().map_err(|_| {
            ProtocolError::MalformedCatalog(format!("non-numeric id for {name:?}"))
        })?;

        table.insert(id, name.into_owned());
        i = value + len;
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// Assembler
// ---------------------------------------------------------------------------

/// Outcome of feeding one chunk to a [`CatalogAssembler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    /// The buffer is still unbalanced; more chunks are needed.
    Pending,
    /// The buffer balanced and was parsed.
    Complete(CatalogReport),
    /// The buffer balanced but held no catalog. The joined text is handed
    /// back for normal dispatch.
    Reassembled(String),
    /// The buffer grew past the configured limit and was discarded.
    Overflow { discarded: usize },
}

/// Reassembles a catalog that may arrive split across lines.
///
/// Any other message the relay splits goes through the same buffer; only
/// a balanced buffer carrying a `DataPackage` tag is parsed as a catalog.
///
/// The buffer is either empty or mid-accumulation: a chunk that completes
/// it is parsed and the buffer is cleared in the same call.
#[derive(Debug, Default)]
pub struct CatalogAssembler {
    buffer: Option<String>,
    limit: Option<usize>,
    loaded: bool,
}

impl CatalogAssembler {
    /// An assembler with no size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// An assembler that gives up on a catalog once its buffered text
    /// exceeds `limit` bytes. `None` means no limit.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Appends `chunk` (starting a new buffer if needed) and parses the
    /// buffer into `catalog` once it forms a complete message.
    pub fn feed(&mut self, chunk: &str, catalog: &mut Catalog) -> Feed {
        let buffer = self.buffer.get_or_insert_with(String::new);
        buffer.push_str(chunk);

        if let Some(limit) = self.limit {
            if buffer.len() > limit {
                let discarded = buffer.len();
                self.buffer = None;
                tracing::warn!(discarded, limit, "catalog exceeded buffer limit, discarded");
                return Feed::Overflow { discarded };
            }
        }

        if !is_complete_message(buffer) {
            tracing::debug!(buffered = buffer.len(), "catalog chunk buffered");
            return Feed::Pending;
        }

        let text = self.buffer.take().unwrap_or_default();
        if !command_tags(&text).contains(&"DataPackage") {
            tracing::debug!(bytes = text.len(), "split message reassembled");
            return Feed::Reassembled(text);
        }
        Feed::Complete(self.parse_complete(&text, catalog))
    }

    /// Parses a catalog that is already known to be whole, leaving any
    /// partial buffer untouched.
    pub fn parse_complete(&mut self, text: &str, catalog: &mut Catalog) -> CatalogReport {
        let report = parse_catalog(text, catalog);
        self.loaded = true;
        tracing::info!(
            games = report.games_added,
            skipped = report.games_skipped,
            failed = report.games_failed,
            items = report.items,
            locations = report.locations,
            "catalog loaded"
        );
        report
    }

    /// Whether a partial catalog is waiting for more chunks.
    pub fn is_accumulating(&self) -> bool {
        self.buffer.is_some()
    }

    /// Whether at least one catalog has been parsed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Drops any partial buffer.
    pub fn reset(&mut self) {
        self.buffer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME_A: &str = r#""Game A":{"item_name_to_id":{"Sword":1,"Shield":2,"Bow":3},"location_name_to_id":{"Chest":10,"Cave":-11},"checksum":"aa"}"#;
    const GAME_B: &str = r#""Game {B}":{"location_name_to_id":{"Tower":20,"Moat":21},"checksum":"bb","item_name_to_id":{"Key \"1\"":4,"Lamp":5,"Rope":6}}"#;

    fn payload(first: &str, second: &str) -> String {
        format!(r#"[{{"cmd":"DataPackage","data":{{"games":{{{first},{second}}}}}}}]"#)
    }

    #[test]
    fn test_two_games_in_either_order() {
        for text in [payload(GAME_A, GAME_B), payload(GAME_B, GAME_A)] {
            let mut catalog = Catalog::new();
            let report = parse_catalog(&text, &mut catalog);

            assert_eq!(report.games_added, 2);
            assert_eq!(report.items, 6);
            assert_eq!(report.locations, 4);

            let a = catalog.game("Game A").unwrap();
            assert_eq!(a.items.len(), 3);
            assert_eq!(a.locations.len(), 2);
            assert_eq!(a.items.name(2), Some("Shield"));
            assert_eq!(a.locations.name(-11), Some("Cave"));

            let b = catalog.game("Game {B}").unwrap();
            assert_eq!(b.items.len(), 3);
            assert_eq!(b.locations.len(), 2);
            assert_eq!(b.items.name(4), Some("Key \"1\""));
            assert_eq!(b.items.id("Rope"), Some(6));
            assert_eq!(b.locations.name(20), Some("Tower"));
        }
    }

    #[test]
    fn test_split_at_every_point_matches_whole_feed() {
        let text = payload(GAME_A, GAME_B);

        let mut whole = Catalog::new();
        let mut assembler = CatalogAssembler::new();
        assert!(matches!(assembler.feed(&text, &mut whole), Feed::Complete(_)));

        for split in 1..text.len() {
            let mut catalog = Catalog::new();
            let mut assembler = CatalogAssembler::new();

            assert_eq!(assembler.feed(&text[..split], &mut catalog), Feed::Pending);
            assert!(assembler.is_accumulating());
            assert!(matches!(assembler.feed(&text[split..], &mut catalog), Feed::Complete(_)));
            assert!(!assembler.is_accumulating());
            assert_eq!(catalog, whole, "split at {split}");
        }
    }

    #[test]
    fn test_split_non_catalog_is_handed_back() {
        let text = r#"[{"cmd":"PrintJSON","data":[{"text":"hello"}]}]"#;
        let mut catalog = Catalog::new();
        let mut assembler = CatalogAssembler::new();

        assert_eq!(assembler.feed(&text[..7], &mut catalog), Feed::Pending);
        assert_eq!(
            assembler.feed(&text[7..], &mut catalog),
            Feed::Reassembled(text.to_string())
        );
        assert!(!assembler.is_loaded());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_three_way_split() {
        let text = payload(GAME_B, GAME_A);
        let (a, rest) = text.split_at(text.len() / 3);
        let (b, c) = rest.split_at(rest.len() / 2);

        let mut catalog = Catalog::new();
        let mut assembler = CatalogAssembler::new();
        assert_eq!(assembler.feed(a, &mut catalog), Feed::Pending);
        assert_eq!(assembler.feed(b, &mut catalog), Feed::Pending);
        assert!(!assembler.is_loaded());
        assert!(matches!(assembler.feed(c, &mut catalog), Feed::Complete(_)));
        assert!(assembler.is_loaded());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_known_games_are_skipped() {
        let text = payload(GAME_A, GAME_B);
        let mut catalog = Catalog::new();
        let mut first = GameTables::default();
        first.items.insert(99, "Existing");
        catalog.insert("Game A", first);

        let report = parse_catalog(&text, &mut catalog);
        assert_eq!(report.games_added, 1);
        assert_eq!(report.games_skipped, 1);
        assert_eq!(catalog.game("Game A").unwrap().items.name(99), Some("Existing"));
    }

    #[test]
    fn test_malformed_section_is_dropped_whole() {
        let bad = r#""Broken":{"item_name_to_id":{"Sword":1,"Shield":"two"},"location_name_to_id":{}}"#;
        let text = payload(bad, GAME_A);
        let mut catalog = Catalog::new();

        let report = parse_catalog(&text, &mut catalog);
        assert_eq!(report.games_failed, 1);
        assert_eq!(report.games_added, 1);
        assert!(!catalog.contains("Broken"));
        assert!(catalog.contains("Game A"));
    }

    #[test]
    fn test_marker_inside_string_is_ignored() {
        let tricky = r#""Quiz":{"item_name_to_id":{"say \"item_name_to_id\":{}":7},"location_name_to_id":{}}"#;
        let mut catalog = Catalog::new();
        let report = parse_catalog(&payload(tricky, GAME_A), &mut catalog);
        assert_eq!(report.games_added, 2);
        assert_eq!(report.games_failed, 0);
        assert_eq!(
            catalog.game("Quiz").unwrap().items.name(7),
            Some(r#"say "item_name_to_id":{}"#)
        );
    }

    #[test]
    fn test_overflow_discards_buffer() {
        let text = payload(GAME_A, GAME_B);
        let mut catalog = Catalog::new();
        let mut assembler = CatalogAssembler::with_limit(Some(32));

        assert_eq!(assembler.feed(&text[..20], &mut catalog), Feed::Pending);
        assert_eq!(
            assembler.feed(&text[20..40], &mut catalog),
            Feed::Overflow { discarded: 40 }
        );
        assert!(!assembler.is_accumulating());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_parse_complete_keeps_partial_buffer() {
        let mut catalog = Catalog::new();
        let mut assembler = CatalogAssembler::new();
        assert_eq!(assembler.feed("[{\"cmd\":\"DataPackage\"", &mut catalog), Feed::Pending);

        let report = assembler.parse_complete(&payload(GAME_A, GAME_B), &mut catalog);
        assert_eq!(report.games_added, 2);
        assert!(assembler.is_loaded());
        assert!(assembler.is_accumulating());
    }

    #[test]
    fn test_reset_drops_partial_buffer() {
        let mut catalog = Catalog::new();
        let mut assembler = CatalogAssembler::new();
        assembler.feed("[{", &mut catalog);
        assembler.reset();
        assert!(!assembler.is_accumulating());
    }
}
