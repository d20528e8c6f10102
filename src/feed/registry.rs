//! Registry of currently mounted feed items.
//!
//! Pure data: no timers, no callbacks. Iteration order is insertion order,
//! which is what arbitration uses to break score ties.

use super::item::{clamp_ratio, FeedItemEntry, ItemData, ItemId, Rect};

#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<FeedItemEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update an item.
    ///
    /// Re-registering keeps the entry's position and last reported
    /// visibility; owner-supplied data is replaced. Returns `true` when the
    /// id was new.
    pub fn register(&mut self, id: ItemId, data: ItemData) -> bool {
        match self.position(&id) {
            Some(idx) => {
                self.entries[idx].data = data;
                false
            }
            None => {
                self.entries.push(FeedItemEntry::new(id, data));
                true
            }
        }
    }

    /// Remove an item, returning its entry if it was registered.
    pub fn unregister(&mut self, id: &ItemId) -> Option<FeedItemEntry> {
        let idx = self.position(id)?;
        Some(self.entries.remove(idx))
    }

    /// Store a visibility report. Returns `false` for unknown ids.
    pub fn update_visibility(&mut self, id: &ItemId, ratio: f64, rect: Rect) -> bool {
        match self.position(id) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                entry.visibility_ratio = clamp_ratio(ratio);
                entry.bounding_rect = Some(rect);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &ItemId) -> Option<&FeedItemEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedItemEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: &ItemId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }
}
