//! Per-slot options the server sends in the handshake's `slot_data`.

use honkbridge_protocol::scan::extract_bool;
use serde::{Deserialize, Serialize};

/// Toggles that change which items this slot can receive.
///
/// Both default to enabled: an older server that sends no `slot_data`, or
/// a `slot_data` without one of the keys, gets the full item pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub include_npc_souls: bool,
    pub include_prop_souls: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            include_npc_souls: true,
            include_prop_souls: true,
        }
    }
}

impl SessionOptions {
    /// Reads the toggles from the raw `slot_data` object. Accepts
    /// `true`/`false` as well as `1`/`0`.
    pub fn from_slot_data(slot_data: Option<&str>) -> Self {
        let defaults = Self::default();
        let Some(block) = slot_data else {
            return defaults;
        };
        Self {
            include_npc_souls: extract_bool(block, "include_npc_souls")
                .unwrap_or(defaults.include_npc_souls),
            include_prop_souls: extract_bool(block, "include_prop_souls")
                .unwrap_or(defaults.include_prop_souls),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_block_enables_everything() {
        assert_eq!(SessionOptions::from_slot_data(None), SessionOptions::default());
        assert_eq!(SessionOptions::from_slot_data(Some("{}")), SessionOptions::default());
    }

    #[test]
    fn test_numeric_and_literal_toggles() {
        let opts = SessionOptions::from_slot_data(Some(
            r#"{"include_npc_souls":0,"include_prop_souls":true}"#,
        ));
        assert!(!opts.include_npc_souls);
        assert!(opts.include_prop_souls);

        let opts = SessionOptions::from_slot_data(Some(r#"{"include_prop_souls": false}"#));
        assert!(opts.include_npc_souls);
        assert!(!opts.include_prop_souls);
    }
}
