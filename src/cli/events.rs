use serde::Serialize;

use crate::feed::ActiveItem;

/// Events produced while replaying a scroll script.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    /// A script step was applied to the engine
    Step { at_ms: u64, description: String },

    /// The engine told an item to play
    Play { at_ms: u64, id: String },

    /// The engine told an item to pause
    Pause { at_ms: u64, id: String },

    /// The published active item changed
    ActiveChanged {
        at_ms: u64,
        item: Option<ActiveItem>,
    },

    /// Replay finished; the settled active item and its assistant context
    Finished {
        at_ms: u64,
        item: Option<ActiveItem>,
        context: Option<String>,
    },
}
