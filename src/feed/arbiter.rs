//! Winner selection over the registry.

use super::item::{FeedItemEntry, ItemId};
use super::registry::Registry;
use super::scorer::{Scorer, Viewport};

/// Result of one arbitration pass.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub winner: &'a FeedItemEntry,
    pub score: f64,
}

/// Pick the entry with the strictly greatest score.
///
/// Ties go to the entry registered first. Returns `None` when no entry
/// qualifies.
pub fn select_winner<'a>(
    registry: &'a Registry,
    scorer: &dyn Scorer,
    current: Option<&ItemId>,
    viewport: &Viewport,
) -> Option<Selection<'a>> {
    let mut best: Option<Selection<'a>> = None;
    for entry in registry.iter() {
        let is_active = current == Some(&entry.id);
        let Some(score) = scorer.score(entry, is_active, viewport) else {
            continue;
        };
        if score.is_nan() {
            continue;
        }
        match &best {
            Some(b) if score <= b.score => {}
            _ => best = Some(Selection { winner: entry, score }),
        }
    }
    best
}
