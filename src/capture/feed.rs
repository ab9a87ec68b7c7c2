//! Channel adapter between a key-press source and a tracker.
//!
//! The source (a UI binding, a terminal reader, a replayed log) only needs a
//! `Sender<KeyPress>`. The thread that owns the tracker drains the feed.

use crate::capture::types::KeyPress;
use crate::core::tracker::CadenceTracker;
use crossbeam_channel::{bounded, Receiver, Sender};

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// A bounded queue of key presses waiting to be recorded.
pub struct KeyFeed {
    sender: Sender<KeyPress>,
    receiver: Receiver<KeyPress>,
}

impl KeyFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// A sender handle for the event source. Clone freely across threads.
    pub fn sender(&self) -> Sender<KeyPress> {
        self.sender.clone()
    }

    /// Get the receiver for key presses.
    pub fn receiver(&self) -> &Receiver<KeyPress> {
        &self.receiver
    }

    /// Try to receive a press without blocking.
    pub fn try_recv(&self) -> Option<KeyPress> {
        self.receiver.try_recv().ok()
    }

    /// Number of presses currently queued.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Record every queued press into `tracker`, in arrival order.
    ///
    /// Returns how many presses were recorded.
    pub fn drain_into(&self, tracker: &mut CadenceTracker) -> usize {
        let mut recorded = 0;
        while let Ok(press) = self.receiver.try_recv() {
            tracker.record_key_press(press.key, press.at);
            recorded += 1;
        }
        if recorded > 0 {
            tracing::debug!(recorded, "drained key feed");
        }
        recorded
    }
}

impl Default for KeyFeed {
    fn default() -> Self {
        Self::new()
    }
}
