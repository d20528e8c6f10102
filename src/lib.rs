//! Flock feed engine.
//!
//! Decides which feed item is active (allowed to autoplay) while the user
//! scrolls, and exposes that item to the UI and the assistant.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod feed;

pub use config::{ArbitrationPolicy, FeedConfig};
pub use error::{FlockError, PlaybackError, Result};
pub use feed::{ActiveItem, FeedEngine, ItemData, ItemId, MediaKind, PlaybackCallbacks, Playable, Rect};
