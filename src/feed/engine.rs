//! The arbitration engine.
//!
//! `FeedEngine` owns the registry, the authoritative current winner and the
//! published snapshot. All mutation goes through `register`, `unregister`,
//! `report_visibility` and `set_viewport_height`, none of which await.
//!
//! Passes never overlap: a pass requested while another one is enforcing
//! playback (for example from inside a `play` callback, or from another
//! worker thread) is folded into a rerun of the running pass.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::config::FeedConfig;
use crate::error::Result;

use super::arbiter;
use super::item::{ActiveItem, FeedItemEntry, ItemData, ItemId, Rect};
use super::playback::{self, PlaybackCommand, PlaybackPlan};
use super::publisher::Publisher;
use super::registry::Registry;
use super::scheduler::DebouncedScheduler;
use super::scorer::{scorer_for, Scorer, Viewport};

struct EngineState {
    registry: Registry,
    /// Authoritative winner. Written in the same critical section that
    /// picks it; the published snapshot trails it.
    active_id: Option<ItemId>,
    viewport: Viewport,
    in_pass: bool,
    rerun: bool,
}

struct EngineInner {
    state: Mutex<EngineState>,
    scheduler: DebouncedScheduler,
    publisher: Publisher,
    scorer: Box<dyn Scorer>,
}

/// Cheaply clonable handle to a feed's arbitration engine.
#[derive(Clone)]
pub struct FeedEngine {
    inner: Arc<EngineInner>,
}

impl FeedEngine {
    /// Create an engine using the scorer selected by `config.policy`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: FeedConfig) -> Result<Self> {
        let config = config.normalized();
        let scorer = scorer_for(&config.policy);
        Self::with_scorer(config, scorer)
    }

    /// Create an engine with an explicit scorer.
    pub fn with_scorer(config: FeedConfig, scorer: Box<dyn Scorer>) -> Result<Self> {
        let config = config.normalized();
        let scheduler = DebouncedScheduler::new(config.debounce())?;
        tracing::debug!(
            "[feed] Engine created: policy={}, debounce={}ms",
            scorer.name(),
            config.debounce_ms
        );

        Ok(Self {
            inner: Arc::new(EngineInner {
                state: Mutex::new(EngineState {
                    registry: Registry::new(),
                    active_id: None,
                    viewport: Viewport {
                        height: config.viewport_height,
                    },
                    in_pass: false,
                    rerun: false,
                }),
                scheduler,
                publisher: Publisher::new(),
                scorer,
            }),
        })
    }

    /// Insert or update an item. Visibility history survives re-registration.
    pub fn register(&self, id: impl Into<ItemId>, data: ItemData) {
        let id = id.into();
        let is_new = self.inner.state.lock().registry.register(id.clone(), data);
        if is_new {
            tracing::debug!("[feed] Registered {}", id);
        } else {
            tracing::debug!("[feed] Re-registered {}", id);
        }
    }

    /// Remove an item.
    ///
    /// Removing the current winner clears the active item before returning
    /// and arbitrates immediately, bypassing the debounce window.
    pub fn unregister(&self, id: &ItemId) {
        let was_active = {
            let mut state = self.inner.state.lock();
            if state.registry.unregister(id).is_none() {
                tracing::trace!("[feed] Unregister of unknown item {}", id);
                return;
            }
            let was_active = state.active_id.as_ref() == Some(id);
            if was_active {
                state.active_id = None;
                self.inner.publisher.clear();
            }
            was_active
        };

        tracing::debug!("[feed] Unregistered {} (was_active={})", id, was_active);
        if was_active {
            self.recompute_now();
        }
    }

    /// Record a visibility measurement and arm the debounce window.
    ///
    /// Reports for unknown ids are dropped: observers may fire after unmount.
    pub fn report_visibility(&self, id: &ItemId, ratio: f64, rect: Rect) {
        let known = self
            .inner
            .state
            .lock()
            .registry
            .update_visibility(id, ratio, rect);
        if !known {
            tracing::trace!("[feed] Dropping visibility report for unknown item {}", id);
            return;
        }
        tracing::trace!("[feed] Visibility {} ratio={:.3}", id, ratio);
        self.schedule_pass();
    }

    /// Update the viewport height used by geometry-aware scorers.
    pub fn set_viewport_height(&self, height: f64) {
        if !(height.is_finite() && height > 0.0) {
            tracing::warn!("[feed] Ignoring invalid viewport height {}", height);
            return;
        }
        self.inner.state.lock().viewport = Viewport { height };
        self.schedule_pass();
    }

    /// Cancel any pending debounced pass and arbitrate now.
    pub fn recompute_now(&self) {
        self.inner.scheduler.cancel();
        self.inner.arbitrate();
    }

    pub fn active_item_id(&self) -> Option<ItemId> {
        self.inner.publisher.active_item_id()
    }

    pub fn active_item(&self) -> Option<ActiveItem> {
        self.inner.publisher.active_item()
    }

    /// Subscribe to active-item changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<ActiveItem>> {
        self.inner.publisher.subscribe()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.inner.state.lock().registry.contains(id)
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().registry.is_empty()
    }

    /// Whether a debounced pass is waiting for its quiet window.
    pub fn has_pending_pass(&self) -> bool {
        self.inner.scheduler.is_pending()
    }

    fn schedule_pass(&self) {
        let weak: Weak<EngineInner> = Arc::downgrade(&self.inner);
        self.inner.scheduler.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                inner.arbitrate();
            }
        });
    }
}

/// Clears `in_pass` if a pass unwinds before finishing.
struct PassGuard<'a> {
    state: &'a Mutex<EngineState>,
    armed: bool,
}

impl PassGuard<'_> {
    /// The pass cleared `in_pass` itself under the lock.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock();
            state.in_pass = false;
            state.rerun = false;
            tracing::warn!("[feed] Arbitration pass aborted by a panic");
        }
    }
}

impl EngineInner {
    fn arbitrate(&self) {
        {
            let mut state = self.state.lock();
            if state.in_pass {
                state.rerun = true;
                tracing::trace!("[feed] Pass already running, queued rerun");
                return;
            }
            state.in_pass = true;
        }
        let guard = PassGuard {
            state: &self.state,
            armed: true,
        };

        loop {
            if let Some(plan) = self.decide() {
                let report = playback::enforce(plan, |id, command| self.still_valid(id, command));
                tracing::debug!(
                    "[feed] Playback enforced: paused={}, played={}, failures={}, skipped={}",
                    report.paused,
                    report.played,
                    report.failures,
                    report.skipped
                );
            }

            let mut state = self.state.lock();
            let snapshot = state
                .active_id
                .as_ref()
                .and_then(|id| state.registry.get(id))
                .map(FeedItemEntry::snapshot);
            self.publisher.publish(snapshot);

            if state.rerun {
                state.rerun = false;
                continue;
            }
            state.in_pass = false;
            break;
        }
        guard.disarm();
    }

    /// Whether a planned call still matches the live state. Callbacks run
    /// earlier in the same plan may have unregistered items or moved the
    /// winner.
    fn still_valid(&self, id: &ItemId, command: PlaybackCommand) -> bool {
        let state = self.state.lock();
        if !state.registry.contains(id) {
            return false;
        }
        match command {
            PlaybackCommand::Pause => true,
            PlaybackCommand::Play => state.active_id.as_ref() == Some(id),
        }
    }

    /// Pick the winner and, if it changed, commit it and capture the
    /// playback handles to drive.
    fn decide(&self) -> Option<PlaybackPlan> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let selection = arbiter::select_winner(
            &state.registry,
            self.scorer.as_ref(),
            state.active_id.as_ref(),
            &state.viewport,
        );
        let winner_id = selection.as_ref().map(|s| s.winner.id.clone());
        if winner_id == state.active_id {
            return None;
        }

        match &selection {
            Some(s) => tracing::info!(
                "[feed] Active item {:?} -> {} (score {:.1})",
                state.active_id.as_ref().map(ItemId::as_str),
                s.winner.id,
                s.score
            ),
            None => tracing::info!(
                "[feed] Active item {:?} -> none",
                state.active_id.as_ref().map(ItemId::as_str)
            ),
        }

        let pause = state
            .registry
            .iter()
            .filter(|entry| Some(&entry.id) != winner_id.as_ref())
            .filter_map(|entry| {
                entry
                    .data
                    .playback
                    .clone()
                    .map(|handle| (entry.id.clone(), handle))
            })
            .collect();
        let play = selection.and_then(|s| {
            s.winner
                .data
                .playback
                .clone()
                .map(|handle| (s.winner.id.clone(), handle))
        });

        state.active_id = winner_id;
        Some(PlaybackPlan { pause, play })
    }
}
