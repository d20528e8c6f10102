//! CLI output handling - Event receiver loop.
//!
//! Receives replay events over a channel and renders them as text, JSON
//! lines, or (in quiet mode) only the final active item.

use std::io::{self, Write};

use anyhow::Result;
use tokio::sync::mpsc;

use super::events::FeedEvent;

/// Run the event loop until every sender has been dropped.
///
/// # Arguments
///
/// * `event_rx` - Channel receiver for replay events
/// * `json_mode` - If true, output events as JSON lines
/// * `quiet_mode` - If true, only output the final active item
pub async fn run_event_loop(
    mut event_rx: mpsc::UnboundedReceiver<FeedEvent>,
    json_mode: bool,
    quiet_mode: bool,
) -> Result<()> {
    let mut stdout = io::stdout();
    while let Some(event) = event_rx.recv().await {
        if let Some(line) = render(&event, json_mode, quiet_mode)? {
            writeln!(stdout, "{}", line)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Render one event, or `None` if the mode suppresses it.
fn render(event: &FeedEvent, json_mode: bool, quiet_mode: bool) -> Result<Option<String>> {
    if quiet_mode && !matches!(event, FeedEvent::Finished { .. }) {
        return Ok(None);
    }
    if json_mode {
        return Ok(Some(serde_json::to_string(event)?));
    }

    let line = match event {
        FeedEvent::Step { at_ms, description } => format!("{:>6}ms  {}", at_ms, description),
        FeedEvent::Play { at_ms, id } => format!("{:>6}ms  [play] {}", at_ms, id),
        FeedEvent::Pause { at_ms, id } => format!("{:>6}ms  [pause] {}", at_ms, id),
        FeedEvent::ActiveChanged { at_ms, item } => format!(
            "{:>6}ms  [active] {}",
            at_ms,
            item.as_ref().map_or("none", |i| i.id.as_str())
        ),
        FeedEvent::Finished { item, context, .. } => {
            if quiet_mode {
                item.as_ref().map_or("none", |i| i.id.as_str()).to_string()
            } else {
                match context {
                    Some(ctx) => format!("\n{}", ctx),
                    None => "\nNo active item.".to_string(),
                }
            }
        }
    };
    Ok(Some(line))
}
