//! The callback surface for the game integration.

use honkbridge_protocol::Slot;
use honkbridge_protocol::message::NetworkItem;

use crate::LogEntry;

/// A newly applied item, with its names already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedItem {
    /// The server's index for this item.
    pub index: u64,
    pub item: NetworkItem,
    pub item_name: String,
    /// Name of the player whose world the item was found in.
    pub sender: String,
}

/// Events a session raises while it processes inbound messages.
///
/// Every method has a no-op default, so an integration only implements
/// what it cares about. All calls happen on the task that calls
/// [`Session::tick`](crate::Session::tick), never on the reader task.
pub trait SessionHooks: Send {
    /// The server accepted the handshake.
    fn on_handshake_complete(&mut self, _slot: Option<Slot>) {}

    /// An item not seen before arrived. Called once per item index.
    fn on_item_received(&mut self, _item: &ReceivedItem) {}

    /// Another player triggered the companion-failure broadcast.
    fn on_companion_failure(&mut self, _source: Option<&str>, _cause: Option<&str>) {}

    /// A line was added to the session log.
    fn on_log_entry(&mut self, _entry: &LogEntry) {}

    /// Time to re-apply state derived from received items. `attempt`
    /// counts up from 1 for each arming of the resync timer.
    fn on_resync(&mut self, _attempt: u32) {}
}

/// No hooks at all.
impl SessionHooks for () {}
