//! Published active-item snapshot.
//!
//! Backed by a `watch` channel: subscribers wake only when the snapshot
//! actually changes, not on every visibility report.

use tokio::sync::watch;

use super::item::{ActiveItem, ItemId};

pub struct Publisher {
    tx: watch::Sender<Option<ActiveItem>>,
}

impl Publisher {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Replace the snapshot. Returns `true` if subscribers were notified.
    pub fn publish(&self, snapshot: Option<ActiveItem>) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        })
    }

    pub fn clear(&self) -> bool {
        self.publish(None)
    }

    pub fn active_item(&self) -> Option<ActiveItem> {
        self.tx.borrow().clone()
    }

    pub fn active_item_id(&self) -> Option<ItemId> {
        self.tx.borrow().as_ref().map(|item| item.id.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ActiveItem>> {
        self.tx.subscribe()
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new()
    }
}
