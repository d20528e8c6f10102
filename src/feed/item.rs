//! Feed item types: identifiers, geometry, playback capabilities.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

/// Opaque, stable identifier of a feed item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// What a feed item renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Image,
    #[default]
    Text,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
            MediaKind::Text => "text",
        }
    }
}

/// Item geometry relative to the viewport, as reported by the visibility observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Rect with only vertical geometry, which is all scoring needs.
    pub fn vertical(top: f64, height: f64) -> Self {
        Self {
            top,
            height,
            ..Self::default()
        }
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Playback capability supplied by an item's owner.
///
/// Implementations must tolerate redundant calls: the engine pauses every
/// non-winning item on each winner change without knowing whether it was
/// playing.
pub trait Playable: Send + Sync {
    fn play(&self) -> Result<(), PlaybackError>;

    fn pause(&self) -> Result<(), PlaybackError>;
}

type Callback = Box<dyn Fn() -> Result<(), PlaybackError> + Send + Sync>;

/// `Playable` built from optional closures. A missing closure is a no-op.
#[derive(Default)]
pub struct PlaybackCallbacks {
    on_play: Option<Callback>,
    on_pause: Option<Callback>,
}

impl PlaybackCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_play<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), PlaybackError> + Send + Sync + 'static,
    {
        self.on_play = Some(Box::new(f));
        self
    }

    pub fn on_pause<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), PlaybackError> + Send + Sync + 'static,
    {
        self.on_pause = Some(Box::new(f));
        self
    }
}

impl Playable for PlaybackCallbacks {
    fn play(&self) -> Result<(), PlaybackError> {
        self.on_play.as_ref().map_or(Ok(()), |f| f())
    }

    fn pause(&self) -> Result<(), PlaybackError> {
        self.on_pause.as_ref().map_or(Ok(()), |f| f())
    }
}

/// Data an owner supplies when registering an item.
///
/// Visibility is deliberately absent: only `report_visibility` writes it.
#[derive(Clone, Default)]
pub struct ItemData {
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub kind: MediaKind,
    pub playback: Option<Arc<dyn Playable>>,
}

impl ItemData {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self
    }

    pub fn with_playback(mut self, playback: Arc<dyn Playable>) -> Self {
        self.playback = Some(playback);
        self
    }
}

impl fmt::Debug for ItemData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemData")
            .field("content", &self.content)
            .field("media_url", &self.media_url)
            .field("kind", &self.kind)
            .field("playback", &self.playback.is_some())
            .finish()
    }
}

/// Registry entry for one feed item.
#[derive(Debug, Clone)]
pub struct FeedItemEntry {
    pub id: ItemId,
    pub data: ItemData,
    /// Last reported visible fraction, in [0, 1]
    pub visibility_ratio: f64,
    /// Last reported geometry; `None` until the first report
    pub bounding_rect: Option<Rect>,
}

impl FeedItemEntry {
    pub fn new(id: ItemId, data: ItemData) -> Self {
        Self {
            id,
            data,
            visibility_ratio: 0.0,
            bounding_rect: None,
        }
    }

    pub fn snapshot(&self) -> ActiveItem {
        ActiveItem {
            id: self.id.clone(),
            content: self.data.content.clone(),
            media_url: self.data.media_url.clone(),
            kind: self.data.kind,
        }
    }
}

/// Published view of the winning item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveItem {
    pub id: ItemId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    pub kind: MediaKind,
}

/// Clamp a reported ratio into [0, 1]. `NaN` counts as invisible.
pub fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}
