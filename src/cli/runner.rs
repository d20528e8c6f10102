//! CLI execution runner.
//!
//! Replays a script against a live `FeedEngine`, forwarding playback calls
//! and active-item changes to the output loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::context::assistant_context_for;
use crate::error::PlaybackError;
use crate::feed::{FeedEngine, ItemData, ItemId, Playable, Rect};

use super::bootstrap::CliContext;
use super::events::FeedEvent;
use super::output::run_event_loop;
use super::script::{Action, Script, ScriptItem};

/// Extra wait after the final debounce window before reporting the result.
const SETTLE_MARGIN: Duration = Duration::from_millis(50);

/// Playback capability that reports calls as events.
struct ScriptPlayer {
    id: String,
    start: Instant,
    event_tx: mpsc::UnboundedSender<FeedEvent>,
}

impl Playable for ScriptPlayer {
    fn play(&self) -> Result<(), PlaybackError> {
        self.event_tx
            .send(FeedEvent::Play {
                at_ms: elapsed_ms(self.start),
                id: self.id.clone(),
            })
            .map_err(|_| PlaybackError::Detached)
    }

    fn pause(&self) -> Result<(), PlaybackError> {
        self.event_tx
            .send(FeedEvent::Pause {
                at_ms: elapsed_ms(self.start),
                id: self.id.clone(),
            })
            .map_err(|_| PlaybackError::Detached)
    }
}

/// Replay the context's script and wait for output to drain.
pub async fn execute_script(ctx: &CliContext) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<FeedEvent>();

    let json_mode = ctx.args.json;
    let quiet_mode = ctx.args.quiet;
    let output_handle: JoinHandle<Result<()>> =
        tokio::spawn(async move { run_event_loop(event_rx, json_mode, quiet_mode).await });

    let result = replay(ctx, event_tx).await;

    // The loop exits once the replay's senders (players included) are gone.
    match output_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!("[feed-cli] Output handler error: {}", e);
        }
        Err(e) => {
            tracing::warn!("[feed-cli] Output handler panicked: {}", e);
        }
    }

    result
}

async fn replay(ctx: &CliContext, event_tx: mpsc::UnboundedSender<FeedEvent>) -> Result<()> {
    let start = Instant::now();
    let engine = FeedEngine::new(ctx.config.clone())?;
    let watcher = spawn_active_watcher(&engine, start, event_tx.clone());

    tracing::info!(
        "[feed-cli] Replaying {} steps over {}ms",
        ctx.script.steps.len(),
        ctx.script.duration_ms()
    );

    for step in &ctx.script.steps {
        tokio::time::sleep_until(start + Duration::from_millis(step.at_ms)).await;
        let description = apply(&engine, &ctx.script, &step.action, start, &event_tx);
        let _ = event_tx.send(FeedEvent::Step {
            at_ms: elapsed_ms(start),
            description,
        });
    }

    tokio::time::sleep(ctx.config.debounce() + SETTLE_MARGIN).await;

    let item = engine.active_item();
    let context = assistant_context_for(item.as_ref());
    let _ = event_tx.send(FeedEvent::Finished {
        at_ms: elapsed_ms(start),
        item,
        context,
    });

    // Dropping the engine closes the publisher, which ends the watcher.
    drop(engine);
    if let Err(e) = watcher.await {
        tracing::warn!("[feed-cli] Active item watcher failed: {}", e);
    }
    Ok(())
}

fn apply(
    engine: &FeedEngine,
    script: &Script,
    action: &Action,
    start: Instant,
    event_tx: &mpsc::UnboundedSender<FeedEvent>,
) -> String {
    match action {
        Action::Register { id } => {
            // Validated at load time; a missing item would be a script bug.
            if let Some(item) = script.item(id) {
                engine.register(id.as_str(), item_data(item, start, event_tx));
            }
            format!("register {}", id)
        }
        Action::Unregister { id } => {
            engine.unregister(&ItemId::from(id.as_str()));
            format!("unregister {}", id)
        }
        Action::Report {
            id,
            ratio,
            top,
            height,
        } => {
            engine.report_visibility(
                &ItemId::from(id.as_str()),
                *ratio,
                Rect::vertical(*top, *height),
            );
            format!("report {} ratio={:.2}", id, ratio)
        }
        Action::Viewport { height } => {
            engine.set_viewport_height(*height);
            format!("viewport height={}", height)
        }
        Action::Wait => "wait".to_string(),
    }
}

fn item_data(
    item: &ScriptItem,
    start: Instant,
    event_tx: &mpsc::UnboundedSender<FeedEvent>,
) -> ItemData {
    let mut data = ItemData::new(item.kind);
    data.content = item.content.clone();
    data.media_url = item.media_url.clone();
    if item.is_playable() {
        data.playback = Some(Arc::new(ScriptPlayer {
            id: item.id.clone(),
            start,
            event_tx: event_tx.clone(),
        }));
    }
    data
}

fn spawn_active_watcher(
    engine: &FeedEngine,
    start: Instant,
    event_tx: mpsc::UnboundedSender<FeedEvent>,
) -> JoinHandle<()> {
    let mut rx = engine.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let item = rx.borrow_and_update().clone();
            let event = FeedEvent::ActiveChanged {
                at_ms: elapsed_ms(start),
                item,
            };
            if event_tx.send(event).is_err() {
                break;
            }
        }
    })
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
