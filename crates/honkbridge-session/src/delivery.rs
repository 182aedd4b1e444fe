//! Idempotent delivery in both directions.
//!
//! - **Outbound**: each location is reported at most once per session.
//!   A repeat check is absorbed locally; nothing is re-sent.
//! - **Inbound**: the server numbers every item it has ever given us.
//!   The watermark is the highest index already applied; an item is
//!   applied only if its index is above it, so replays, overlapping
//!   deltas, and full resyncs never deliver an item twice.

use std::collections::HashSet;

use honkbridge_protocol::LocationId;
use honkbridge_protocol::message::{NetworkItem, ReceivedItems};

use crate::SessionStore;

/// What one item delta did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeltaOutcome {
    pub applied: usize,
    /// Items at or below the watermark.
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct DeliveryTracker {
    watermark: Option<u64>,
    sent: HashSet<LocationId>,
}

impl DeliveryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker resuming from a persisted watermark.
    pub fn with_watermark(watermark: Option<u64>) -> Self {
        Self {
            watermark,
            sent: HashSet::new(),
        }
    }

    pub fn watermark(&self) -> Option<u64> {
        self.watermark
    }

    /// Records `location` as reported. Returns `false` if it already was,
    /// in which case the caller must not send it again.
    pub fn mark_sent(&mut self, location: LocationId) -> bool {
        self.sent.insert(location)
    }

    pub fn is_sent(&self, location: LocationId) -> bool {
        self.sent.contains(&location)
    }

    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }

    /// Forgets every reported location.
    pub fn reset_sent(&mut self) {
        self.sent.clear();
    }

    /// Whether the item at `index` has not been applied yet.
    pub fn is_new(&self, index: u64) -> bool {
        self.watermark.is_none_or(|w| index > w)
    }

    /// Applies the new items of `delta` in order.
    ///
    /// For each new item `deliver` runs first, then the watermark moves to
    /// that item's index and is saved right away. A failed save is logged
    /// and does not stop the delta: the in-memory watermark still guards
    /// this session.
    pub fn apply_delta<S, F>(
        &mut self,
        delta: &ReceivedItems,
        store: &mut S,
        mut deliver: F,
    ) -> DeltaOutcome
    where
        S: SessionStore + ?Sized,
        F: FnMut(u64, &NetworkItem),
    {
        let mut outcome = DeltaOutcome::default();

        for (index, item) in &delta.items {
            if !self.is_new(*index) {
                outcome.skipped += 1;
                continue;
            }
            deliver(*index, item);
            self.watermark = Some(*index);
            if let Err(error) = store.save_watermark(self.watermark) {
                tracing::warn!(index, %error, "failed to persist item watermark");
            }
            outcome.applied += 1;
        }

        tracing::debug!(
            start = delta.index,
            applied = outcome.applied,
            skipped = outcome.skipped,
            watermark = ?self.watermark,
            "item delta processed"
        );
        outcome
    }

    /// Adopts a persisted watermark unless this tracker is already past
    /// it. The watermark never moves backwards except through
    /// [`clear_watermark`](Self::clear_watermark).
    pub fn restore_watermark(&mut self, persisted: Option<u64>) {
        self.watermark = self.watermark.max(persisted);
    }

    /// Forgets every applied item ("start fresh"), in memory and in
    /// `store`.
    pub fn clear_watermark<S: SessionStore + ?Sized>(&mut self, store: &mut S) {
        self.watermark = None;
        if let Err(error) = store.save_watermark(None) {
            tracing::warn!(%error, "failed to persist cleared watermark");
        }
    }
}
