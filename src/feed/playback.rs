//! Playback enforcement on winner changes.
//!
//! Every non-winner with a capability is paused, then the winner is played.
//! Each call is gated on the live engine state at the moment it is made, so
//! a callback that unregisters an item earlier in the plan cannot get that
//! item played. Capability failures (errors or panics) are logged and
//! swallowed.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use super::item::{ItemId, Playable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
}

impl PlaybackCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackCommand::Play => "play",
            PlaybackCommand::Pause => "pause",
        }
    }
}

/// Capability handles captured for one winner change.
///
/// Built while the registry is locked, executed after the lock is released
/// so capabilities may call back into the engine.
#[derive(Default)]
pub struct PlaybackPlan {
    pub pause: Vec<(ItemId, Arc<dyn Playable>)>,
    pub play: Option<(ItemId, Arc<dyn Playable>)>,
}

/// Counts from one enforcement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnforcementReport {
    pub paused: usize,
    pub played: usize,
    pub failures: usize,
    /// Calls dropped because `still_valid` rejected them.
    pub skipped: usize,
}

/// Run `plan`, asking `still_valid` before every call.
///
/// `still_valid` is called with no engine lock held and must answer from
/// the current state, not from the state the plan was built against.
pub fn enforce<F>(plan: PlaybackPlan, still_valid: F) -> EnforcementReport
where
    F: Fn(&ItemId, PlaybackCommand) -> bool,
{
    let mut report = EnforcementReport::default();

    for (id, handle) in &plan.pause {
        if !still_valid(id, PlaybackCommand::Pause) {
            tracing::trace!("[feed] Skipping pause for departed item {}", id);
            report.skipped += 1;
        } else if invoke(id, handle.as_ref(), PlaybackCommand::Pause) {
            report.paused += 1;
        } else {
            report.failures += 1;
        }
    }

    if let Some((id, handle)) = &plan.play {
        if !still_valid(id, PlaybackCommand::Play) {
            tracing::debug!("[feed] Skipping play for {}: no longer the winner", id);
            report.skipped += 1;
        } else if invoke(id, handle.as_ref(), PlaybackCommand::Play) {
            report.played += 1;
        } else {
            report.failures += 1;
        }
    }

    report
}

fn invoke(id: &ItemId, handle: &dyn Playable, command: PlaybackCommand) -> bool {
    let outcome = catch_unwind(AssertUnwindSafe(|| match command {
        PlaybackCommand::Play => handle.play(),
        PlaybackCommand::Pause => handle.pause(),
    }));

    match outcome {
        Ok(Ok(())) => {
            tracing::trace!("[feed] {} -> {}", command.as_str(), id);
            true
        }
        Ok(Err(e)) => {
            tracing::warn!("[feed] {} failed for {}: {}", command.as_str(), id, e);
            false
        }
        Err(_) => {
            tracing::warn!("[feed] {} panicked for {}", command.as_str(), id);
            false
        }
    }
}
