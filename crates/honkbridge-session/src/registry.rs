//! Name registries: the built-in table for the local game and the remote
//! catalog for every game in the room.
//!
//! Lookups never fail. When no table knows an id, the answer is a
//! generated placeholder that only depends on the id, so the same unknown
//! id always renders the same way.

use honkbridge_protocol::{Catalog, ItemId, LocationId};

use crate::local_table;

/// First id of the local game's id space.
pub const BASE_ID: i64 = 119_000_000;

/// Offsets past this are outside the local game's id space.
const LOCAL_SPAN: i64 = 9_999;

fn local_offset(id: i64) -> Option<i64> {
    let offset = id.checked_sub(BASE_ID)?;
    (0..=LOCAL_SPAN).contains(&offset).then_some(offset)
}

fn lookup(table: &'static [(i64, &'static str)], offset: i64) -> Option<&'static str> {
    table
        .binary_search_by(|(o, _)| o.cmp(&offset))
        .ok()
        .map(|i| table[i].1)
}

// ---------------------------------------------------------------------------
// Id segmentation
// ---------------------------------------------------------------------------

/// Category of a local item, by id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    AreaAccess,
    NpcSoul,
    Filler,
    Trap,
    PropSoul,
    Victory,
    Other,
}

impl ItemKind {
    pub fn of(id: ItemId) -> Self {
        match local_offset(id.0) {
            Some(100..=110) => Self::AreaAccess,
            Some(120..=130) => Self::NpcSoul,
            Some(200..=204) => Self::Filler,
            Some(300..=303) => Self::Trap,
            Some(400..=621) => Self::PropSoul,
            Some(999) => Self::Victory,
            _ => Self::Other,
        }
    }
}

/// Category of a local location, by id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    Goal,
    Pickup,
    Drag,
    Interaction,
    Other,
}

impl LocationKind {
    pub fn of(id: LocationId) -> Self {
        match local_offset(id.0) {
            Some(1..=94) => Self::Goal,
            Some(1001..=1199 | 1400..=1452) => Self::Pickup,
            Some(1201..=1299) => Self::Drag,
            Some(1301..=1399) => Self::Interaction,
            _ => Self::Other,
        }
    }

    /// Generic label for a location in a known range whose exact name is
    /// not in the table.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Pickup => Some("Pickup Item"),
            Self::Drag => Some("Drag Item"),
            Self::Interaction => Some("Interaction"),
            Self::Goal | Self::Other => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Local registry
// ---------------------------------------------------------------------------

/// Exact name of a local item.
pub fn local_item_name(id: ItemId) -> Option<&'static str> {
    lookup(local_table::ITEMS, local_offset(id.0)?)
}

/// Exact name of a local location.
pub fn local_location_name(id: LocationId) -> Option<&'static str> {
    lookup(local_table::LOCATIONS, local_offset(id.0)?)
}

/// Placeholder for an item nobody knows. Ids in the local id space are
/// shown by offset, anything else by raw id.
pub fn unknown_item(id: ItemId) -> String {
    format!("Unknown Item ({})", local_offset(id.0).unwrap_or(id.0))
}

/// Placeholder for a location nobody knows.
pub fn unknown_location(id: LocationId) -> String {
    format!("Location {}", local_offset(id.0).unwrap_or(id.0))
}

// ---------------------------------------------------------------------------
// Registries
// ---------------------------------------------------------------------------

/// The local table plus the remote catalog.
#[derive(Debug, Default)]
pub struct Registries {
    catalog: Catalog,
}

impl Registries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mutable access for the catalog assembler.
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Resolves an item name.
    ///
    /// Order: the owning game's remote table, the local table, every remote
    /// table in game-name order, then a placeholder.
    pub fn item_name(&self, id: ItemId, owner_game: Option<&str>) -> String {
        if let Some(name) = owner_game
            .and_then(|game| self.catalog.game(game))
            .and_then(|tables| tables.items.name(id.0))
        {
            return name.to_string();
        }
        if let Some(name) = local_item_name(id) {
            return name.to_string();
        }
        self.catalog
            .games()
            .find_map(|(_, tables)| tables.items.name(id.0))
            .map_or_else(|| unknown_item(id), str::to_string)
    }

    /// Resolves a location name; same order as [`item_name`](Self::item_name)
    /// with the local range label tried before the placeholder.
    pub fn location_name(&self, id: LocationId, owner_game: Option<&str>) -> String {
        if let Some(name) = owner_game
            .and_then(|game| self.catalog.game(game))
            .and_then(|tables| tables.locations.name(id.0))
        {
            return name.to_string();
        }
        if let Some(name) = local_location_name(id) {
            return name.to_string();
        }
        if let Some(name) = self
            .catalog
            .games()
            .find_map(|(_, tables)| tables.locations.name(id.0))
        {
            return name.to_string();
        }
        LocationKind::of(id)
            .label()
            .map_or_else(|| unknown_location(id), str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use honkbridge_protocol::GameTables;

    fn is_sorted_by_offset(table: &[(i64, &str)]) -> bool {
        table.windows(2).all(|pair| pair[0].0 < pair[1].0)
    }

    fn registries_with(game: &str, items: &[(i64, &str)], locations: &[(i64, &str)]) -> Registries {
        let mut tables = GameTables::default();
        for (id, name) in items {
            tables.items.insert(*id, *name);
        }
        for (id, name) in locations {
            tables.locations.insert(*id, *name);
        }
        let mut registries = Registries::new();
        registries.catalog_mut().insert(game, tables);
        registries
    }

    #[test]
    fn test_local_tables_are_sorted() {
        assert!(is_sorted_by_offset(local_table::ITEMS));
        assert!(is_sorted_by_offset(local_table::LOCATIONS));
    }

    #[test]
    fn test_local_item_lookup() {
        assert_eq!(local_item_name(ItemId(BASE_ID + 100)), Some("Garden Access"));
        assert_eq!(local_item_name(ItemId(BASE_ID + 999)), Some("Escape Sequence"));
        assert_eq!(local_item_name(ItemId(BASE_ID + 409)), None);
        assert_eq!(local_item_name(ItemId(100)), None);
    }

    #[test]
    fn test_item_kind_segmentation() {
        assert_eq!(ItemKind::of(ItemId(BASE_ID + 105)), ItemKind::AreaAccess);
        assert_eq!(ItemKind::of(ItemId(BASE_ID + 125)), ItemKind::NpcSoul);
        assert_eq!(ItemKind::of(ItemId(BASE_ID + 204)), ItemKind::Filler);
        assert_eq!(ItemKind::of(ItemId(BASE_ID + 301)), ItemKind::Trap);
        assert_eq!(ItemKind::of(ItemId(BASE_ID + 621)), ItemKind::PropSoul);
        assert_eq!(ItemKind::of(ItemId(BASE_ID + 999)), ItemKind::Victory);
        assert_eq!(ItemKind::of(ItemId(7)), ItemKind::Other);
    }

    #[test]
    fn test_location_range_labels() {
        let reg = Registries::new();
        assert_eq!(reg.location_name(LocationId(BASE_ID + 1), None), "Get into the garden");
        assert_eq!(reg.location_name(LocationId(BASE_ID + 1198), None), "Pickup Item");
        assert_eq!(reg.location_name(LocationId(BASE_ID + 1299), None), "Drag Item");
        assert_eq!(reg.location_name(LocationId(BASE_ID + 1398), None), "Interaction");
        assert_eq!(reg.location_name(LocationId(BASE_ID + 95), None), "Location 95");
    }

    #[test]
    fn test_unknown_ids_get_deterministic_placeholders() {
        let reg = Registries::new();
        assert_eq!(reg.item_name(ItemId(BASE_ID + 777), None), "Unknown Item (777)");
        assert_eq!(reg.item_name(ItemId(BASE_ID + 777), None), "Unknown Item (777)");
        assert_eq!(reg.item_name(ItemId(-5), Some("Nowhere")), "Unknown Item (-5)");
        assert_eq!(reg.location_name(LocationId(123), None), "Location 123");
    }

    #[test]
    fn test_owner_game_table_wins() {
        let mut reg = registries_with("Game A", &[(BASE_ID + 100, "Remote Sword")], &[]);
        let mut other = GameTables::default();
        other.items.insert(42, "Lamp");
        reg.catalog_mut().insert("Game B", other);

        assert_eq!(reg.item_name(ItemId(BASE_ID + 100), Some("Game A")), "Remote Sword");
        // Without an owner the local table answers first.
        assert_eq!(reg.item_name(ItemId(BASE_ID + 100), None), "Garden Access");
        // Unknown owner falls through to the scan.
        assert_eq!(reg.item_name(ItemId(42), Some("Game C")), "Lamp");
    }

    #[test]
    fn test_remote_scan_is_in_game_name_order() {
        let mut reg = registries_with("Zeta", &[(5, "From Zeta")], &[(9, "Zeta Spot")]);
        let mut alpha = GameTables::default();
        alpha.items.insert(5, "From Alpha");
        reg.catalog_mut().insert("Alpha", alpha);

        assert_eq!(reg.item_name(ItemId(5), None), "From Alpha");
        assert_eq!(reg.location_name(LocationId(9), None), "Zeta Spot");
    }
}
