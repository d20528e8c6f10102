//! Candidacy scoring.
//!
//! A score of `None` disqualifies the entry. Among qualified entries the
//! highest score wins.

use crate::config::ArbitrationPolicy;

use super::item::FeedItemEntry;

/// Viewport geometry available to scorers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub height: f64,
}

impl Viewport {
    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }
}

pub trait Scorer: Send + Sync {
    /// Score one entry. `is_active` is true for the current winner.
    fn score(&self, entry: &FeedItemEntry, is_active: bool, viewport: &Viewport) -> Option<f64>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Visibility percentage plus a fixed bonus for the incumbent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HysteresisScorer {
    pub floor: f64,
    pub bonus: f64,
}

impl Default for HysteresisScorer {
    fn default() -> Self {
        Self {
            floor: 0.2,
            bonus: 50.0,
        }
    }
}

impl Scorer for HysteresisScorer {
    fn score(&self, entry: &FeedItemEntry, is_active: bool, _viewport: &Viewport) -> Option<f64> {
        entry.bounding_rect?;
        if entry.visibility_ratio < self.floor {
            return None;
        }
        let bonus = if is_active { self.bonus } else { 0.0 };
        Some(entry.visibility_ratio * 100.0 + bonus)
    }

    fn name(&self) -> &'static str {
        "hysteresis"
    }
}

/// Closest vertical centre to the viewport centre wins. No incumbent bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterDistanceScorer {
    pub floor: f64,
}

impl Default for CenterDistanceScorer {
    fn default() -> Self {
        Self { floor: 0.3 }
    }
}

impl Scorer for CenterDistanceScorer {
    fn score(&self, entry: &FeedItemEntry, _is_active: bool, viewport: &Viewport) -> Option<f64> {
        let rect = entry.bounding_rect?;
        if entry.visibility_ratio < self.floor {
            return None;
        }
        Some(-(rect.center_y() - viewport.center_y()).abs())
    }

    fn name(&self) -> &'static str {
        "center_distance"
    }
}

/// Build the scorer selected by configuration.
pub fn scorer_for(policy: &ArbitrationPolicy) -> Box<dyn Scorer> {
    match *policy {
        ArbitrationPolicy::Hysteresis { floor, bonus } => {
            Box::new(HysteresisScorer { floor, bonus })
        }
        ArbitrationPolicy::CenterDistance { floor } => Box::new(CenterDistanceScorer { floor }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::item::{ItemData, MediaKind, Rect};

    const VIEWPORT: Viewport = Viewport { height: 800.0 };

    fn entry(ratio: f64, rect: Option<Rect>) -> FeedItemEntry {
        let mut entry = FeedItemEntry::new("x".into(), ItemData::new(MediaKind::Video));
        entry.visibility_ratio = ratio;
        entry.bounding_rect = rect;
        entry
    }

    #[test]
    fn test_hysteresis_scores() {
        let scorer = HysteresisScorer::default();
        let rect = Some(Rect::vertical(0.0, 400.0));

        assert_eq!(scorer.score(&entry(0.9, rect), false, &VIEWPORT), Some(90.0));
        assert_eq!(scorer.score(&entry(0.9, rect), true, &VIEWPORT), Some(140.0));
        assert_eq!(scorer.score(&entry(0.2, rect), false, &VIEWPORT), Some(20.0));
    }

    #[test]
    fn test_hysteresis_floor_ignores_bonus() {
        let scorer = HysteresisScorer::default();
        let rect = Some(Rect::vertical(0.0, 400.0));
        assert_eq!(scorer.score(&entry(0.1, rect), true, &VIEWPORT), None);
        assert_eq!(scorer.score(&entry(0.19, rect), false, &VIEWPORT), None);
    }

    #[test]
    fn test_unmeasured_entry_never_scores() {
        assert_eq!(
            HysteresisScorer::default().score(&entry(1.0, None), true, &VIEWPORT),
            None
        );
        assert_eq!(
            CenterDistanceScorer::default().score(&entry(1.0, None), false, &VIEWPORT),
            None
        );
    }

    #[test]
    fn test_center_distance_prefers_centered_item() {
        let scorer = CenterDistanceScorer::default();
        let centered = entry(0.5, Some(Rect::vertical(300.0, 200.0)));
        let offset = entry(1.0, Some(Rect::vertical(0.0, 300.0)));

        let centered_score = scorer.score(&centered, false, &VIEWPORT).unwrap();
        let offset_score = scorer.score(&offset, true, &VIEWPORT).unwrap();
        assert_eq!(centered_score, 0.0);
        assert_eq!(offset_score, -250.0);
        assert!(centered_score > offset_score);
    }

    #[test]
    fn test_center_distance_floor() {
        let scorer = CenterDistanceScorer::default();
        let rect = Some(Rect::vertical(300.0, 200.0));
        assert_eq!(scorer.score(&entry(0.25, rect), false, &VIEWPORT), None);
        assert!(scorer.score(&entry(0.3, rect), false, &VIEWPORT).is_some());
    }

    #[test]
    fn test_scorer_for_policy() {
        assert_eq!(scorer_for(&ArbitrationPolicy::default()).name(), "hysteresis");
        assert_eq!(
            scorer_for(&ArbitrationPolicy::CenterDistance { floor: 0.3 }).name(),
            "center_distance"
        );
    }
}
