//! Test helpers: a shared playback log and recording players.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::PlaybackError;

use super::engine::FeedEngine;
use super::item::{ItemData, MediaKind, Playable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Play(String),
    Pause(String),
    Unmount(String),
}

/// Ordered record of every playback call made across all items.
#[derive(Clone, Default)]
pub struct PlaybackLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl PlaybackLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Item data for a video whose player records into this log.
    pub fn video(&self, id: &str) -> ItemData {
        ItemData::new(MediaKind::Video)
            .with_media_url(format!("https://cdn.example.org/{id}.mp4"))
            .with_playback(Arc::new(RecordingPlayer {
                id: id.to_string(),
                log: self.clone(),
            }))
    }

    /// Mark an item's player as gone, as its owner does on unmount.
    pub fn unmount(&self, id: &str) {
        self.calls.lock().push(Call::Unmount(id.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn plays(&self, id: &str) -> usize {
        self.count(|c| matches!(c, Call::Play(x) if x == id))
    }

    pub fn pauses(&self, id: &str) -> usize {
        self.count(|c| matches!(c, Call::Pause(x) if x == id))
    }

    /// Ids whose most recent call was `play`.
    pub fn playing(&self) -> Vec<String> {
        let calls = self.calls.lock();
        let mut playing: Vec<String> = Vec::new();
        for call in calls.iter() {
            match call {
                Call::Play(id) => {
                    if !playing.contains(id) {
                        playing.push(id.clone());
                    }
                }
                Call::Pause(id) | Call::Unmount(id) => playing.retain(|p| p != id),
            }
        }
        playing
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    fn push(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

struct RecordingPlayer {
    id: String,
    log: PlaybackLog,
}

impl Playable for RecordingPlayer {
    fn play(&self) -> Result<(), PlaybackError> {
        self.log.push(Call::Play(self.id.clone()));
        Ok(())
    }

    fn pause(&self) -> Result<(), PlaybackError> {
        self.log.push(Call::Pause(self.id.clone()));
        Ok(())
    }
}

/// Wait until no debounced pass is pending.
pub async fn settle(engine: &FeedEngine) {
    while engine.has_pending_pass() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
