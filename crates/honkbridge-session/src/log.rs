//! Bounded log of human-readable session messages.

use std::collections::VecDeque;
use std::time::SystemTime;

/// How many entries the ring keeps.
pub const LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Chat,
    Item,
    Hint,
    Join,
    Leave,
    Goal,
    /// Lines produced by the client itself (connection status and such).
    System,
}

impl LogCategory {
    /// Maps a structured text message's `type` to a category. Anything
    /// unrecognized is treated as chat.
    pub fn from_print_type(kind: Option<&str>) -> Self {
        match kind {
            Some("ItemSend" | "ItemCheat" | "Collect" | "Release") => Self::Item,
            Some("Hint") => Self::Hint,
            Some("Join") => Self::Join,
            Some("Part") => Self::Leave,
            Some("Goal") => Self::Goal,
            _ => Self::Chat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub category: LogCategory,
    pub timestamp: SystemTime,
}

impl LogEntry {
    pub fn new(text: impl Into<String>, category: LogCategory) -> Self {
        Self {
            text: text.into(),
            category,
            timestamp: SystemTime::now(),
        }
    }
}

/// The most recent [`LOG_CAPACITY`] entries, oldest first.
#[derive(Debug, Clone)]
pub struct LogRing {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogRing {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

impl LogRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `entry`, returning the evicted oldest entry when full.
    pub fn push(&mut self, entry: LogEntry) -> Option<LogEntry> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_caps_at_capacity_and_evicts_oldest() {
        let mut ring = LogRing::new();
        for i in 0..LOG_CAPACITY {
            assert!(ring.push(LogEntry::new(format!("line {i}"), LogCategory::Chat)).is_none());
        }
        assert_eq!(ring.len(), LOG_CAPACITY);

        let evicted = ring.push(LogEntry::new("line 100", LogCategory::Chat));
        assert_eq!(evicted.map(|e| e.text), Some("line 0".to_string()));
        assert_eq!(ring.len(), LOG_CAPACITY);

        let texts: Vec<_> = ring.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts.first(), Some(&"line 1"));
        assert_eq!(texts.last(), Some(&"line 100"));
        assert!(texts.windows(2).all(|w| {
            let a: usize = w[0][5..].parse().unwrap();
            let b: usize = w[1][5..].parse().unwrap();
            b == a + 1
        }));
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(LogCategory::from_print_type(Some("ServerChat")), LogCategory::Chat);
        assert_eq!(LogCategory::from_print_type(Some("Chat")), LogCategory::Chat);
        assert_eq!(LogCategory::from_print_type(Some("ItemCheat")), LogCategory::Item);
        assert_eq!(LogCategory::from_print_type(Some("Release")), LogCategory::Item);
        assert_eq!(LogCategory::from_print_type(Some("Hint")), LogCategory::Hint);
        assert_eq!(LogCategory::from_print_type(Some("Join")), LogCategory::Join);
        assert_eq!(LogCategory::from_print_type(Some("Part")), LogCategory::Leave);
        assert_eq!(LogCategory::from_print_type(Some("Goal")), LogCategory::Goal);
        assert_eq!(LogCategory::from_print_type(Some("Countdown")), LogCategory::Chat);
        assert_eq!(LogCategory::from_print_type(None), LogCategory::Chat);
    }
}
