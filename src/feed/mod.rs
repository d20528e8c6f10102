//! Feed active-item arbitration.
//!
//! Decides which of the currently visible feed items is "active" (allowed
//! to autoplay) and keeps at most one item playing at a time.
//!
//! ## Flow
//!
//! ```text
//! visibility observer -> Registry -> DebouncedScheduler -> arbiter (Scorer)
//!                                                            |
//!                                       playback enforcement + Publisher
//! ```
//!
//! - **Registry**: known items and their last reported visibility.
//! - **Scorer**: maps one item's visibility to a candidacy score.
//! - **DebouncedScheduler**: coalesces report bursts into one pass per quiet window.
//! - **arbiter**: picks the highest-scoring item.
//! - **playback**: pauses every non-winner, plays the winner.
//! - **Publisher**: the observable active-item snapshot.
//!
//! `FeedEngine` wires these together and is the only type most callers need.

pub mod arbiter;
pub mod engine;
pub mod item;
pub mod playback;
pub mod publisher;
pub mod registry;
pub mod scheduler;
pub mod scorer;

#[cfg(test)]
mod testing;

pub use engine::FeedEngine;
pub use item::{ActiveItem, ItemData, ItemId, MediaKind, PlaybackCallbacks, Playable, Rect};
pub use scorer::{CenterDistanceScorer, HysteresisScorer, Scorer, Viewport};
