//! Slot → player name and slot → game lookups.

use std::collections::BTreeMap;

use honkbridge_protocol::Slot;
use honkbridge_protocol::message::{PlayerRecord, SlotInfo};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PlayerEntry {
    name: Option<String>,
    game: Option<String>,
}

/// Who is in the room and what they are playing.
///
/// Rebuilt from scratch on every handshake. A slot that was never
/// described still has a name: `"Player N"`.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    entries: BTreeMap<Slot, PlayerEntry>,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the directory with the contents of a handshake reply.
    ///
    /// `players` is applied first. `slot_info` then fills in the game of
    /// slots already present and adds slots the player list did not
    /// mention. A missing or empty name never overwrites a known one.
    pub fn rebuild(&mut self, players: &[PlayerRecord], slot_info: &[SlotInfo]) {
        self.entries.clear();

        for record in players {
            let entry = self.entries.entry(record.slot).or_default();
            if let Some(name) = record.display_name() {
                entry.name = Some(name.to_string());
            }
            if let Some(game) = record.game.as_deref().filter(|g| !g.is_empty()) {
                entry.game = Some(game.to_string());
            }
        }

        for info in slot_info {
            let entry = self.entries.entry(info.slot).or_default();
            if let Some(game) = info.game.as_deref().filter(|g| !g.is_empty()) {
                entry.game = Some(game.to_string());
            }
            if entry.name.is_none() {
                entry.name = info.name.clone().filter(|n| !n.is_empty());
            }
        }

        tracing::debug!(players = self.entries.len(), "player directory rebuilt");
    }

    /// Applies name changes from a room update, keeping everything else.
    pub fn update_names(&mut self, players: &[PlayerRecord]) {
        for record in players {
            if let Some(name) = record.display_name() {
                self.entries.entry(record.slot).or_default().name = Some(name.to_string());
            }
        }
    }

    /// Display name of `slot`, or `"Player N"` if unknown.
    pub fn player_name(&self, slot: Slot) -> String {
        self.entries
            .get(&slot)
            .and_then(|e| e.name.clone())
            .unwrap_or_else(|| format!("Player {slot}"))
    }

    /// Game `slot` is playing, if known.
    pub fn player_game(&self, slot: Slot) -> Option<&str> {
        self.entries.get(&slot)?.game.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        slot: u32,
        name: Option<&str>,
        alias: Option<&str>,
        game: Option<&str>,
    ) -> PlayerRecord {
        PlayerRecord {
            slot: Slot(slot),
            name: name.map(str::to_string),
            alias: alias.map(str::to_string),
            game: game.map(str::to_string),
        }
    }

    fn info(slot: u32, name: Option<&str>, game: Option<&str>) -> SlotInfo {
        SlotInfo {
            slot: Slot(slot),
            name: name.map(str::to_string),
            game: game.map(str::to_string),
        }
    }

    #[test]
    fn test_players_only_scenario() {
        let mut dir = PlayerDirectory::new();
        dir.rebuild(&[record(1, Some("Ava"), None, Some("Game A"))], &[]);

        assert_eq!(dir.player_game(Slot(1)), Some("Game A"));
        assert_eq!(dir.player_name(Slot(1)), "Ava");
        assert_eq!(dir.player_name(Slot(2)), "Player 2");
        assert_eq!(dir.player_game(Slot(2)), None);
    }

    #[test]
    fn test_alias_wins_over_name_unless_empty() {
        let mut dir = PlayerDirectory::new();
        dir.rebuild(
            &[
                record(1, Some("ava_1"), Some("Ava"), None),
                record(2, Some("goose"), Some(""), None),
            ],
            &[],
        );
        assert_eq!(dir.player_name(Slot(1)), "Ava");
        assert_eq!(dir.player_name(Slot(2)), "goose");
    }

    #[test]
    fn test_slot_info_fills_games_and_adds_slots() {
        let mut dir = PlayerDirectory::new();
        dir.rebuild(
            &[record(1, Some("Ava"), None, None)],
            &[info(1, Some("ignored"), Some("Game A")), info(7, Some("Late"), Some("Game B"))],
        );
        assert_eq!(dir.player_name(Slot(1)), "Ava");
        assert_eq!(dir.player_game(Slot(1)), Some("Game A"));
        assert_eq!(dir.player_name(Slot(7)), "Late");
        assert_eq!(dir.player_game(Slot(7)), Some("Game B"));
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn test_empty_names_never_overwrite() {
        let mut dir = PlayerDirectory::new();
        dir.rebuild(&[record(3, Some(""), Some(""), Some("Game C"))], &[info(3, Some(""), None)]);
        assert_eq!(dir.player_name(Slot(3)), "Player 3");
        assert_eq!(dir.player_game(Slot(3)), Some("Game C"));

        dir.update_names(&[record(3, Some("Cleo"), None, None)]);
        dir.update_names(&[record(3, Some(""), None, None)]);
        assert_eq!(dir.player_name(Slot(3)), "Cleo");
        assert_eq!(dir.player_game(Slot(3)), Some("Game C"));
    }

    #[test]
    fn test_rebuild_replaces_previous_contents() {
        let mut dir = PlayerDirectory::new();
        dir.rebuild(&[record(1, Some("Ava"), None, None)], &[]);
        dir.rebuild(&[record(2, Some("Bo"), None, None)], &[]);
        assert_eq!(dir.player_name(Slot(1)), "Player 1");
        assert_eq!(dir.player_name(Slot(2)), "Bo");
    }
}
