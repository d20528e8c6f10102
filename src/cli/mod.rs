//! CLI module for replaying scroll scripts.
//!
//! Drives the same `FeedEngine` the app embeds, with playback capabilities
//! that report into a channel instead of controlling real players.
//!
//! ```text
//! +-------------+     +-------------+     +---------------+
//! | script.rs   | --> | FeedEngine  | --> | output.rs     |
//! | (steps)     |     | (play/pause)|     | (print/JSON)  |
//! +-------------+     +-------------+     +---------------+
//! ```

mod args;
mod bootstrap;
mod events;
mod output;
mod runner;
mod script;

pub use args::Args;
pub use bootstrap::{initialize, CliContext};
pub use events::FeedEvent;
pub use output::run_event_loop;
pub use runner::execute_script;
pub use script::{Action, Script, ScriptItem, Step};
