//! Debounced recomputation scheduling.
//!
//! A single pending task at a time: every `schedule` call cancels the
//! previous task and arms a fresh quiet window. `cancel` drops the pending
//! task so a caller can run the work immediately instead.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{FlockError, Result};

pub struct DebouncedScheduler {
    window: Duration,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedScheduler {
    /// Create a scheduler bound to the current tokio runtime.
    pub fn new(window: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| FlockError::NoRuntime(e.to_string()))?;
        Ok(Self {
            window,
            runtime,
            pending: Mutex::new(None),
        })
    }

    /// Cancel any pending task and run `task` once the window passes quietly.
    pub fn schedule<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let window = self.window;
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(window).await;
            task();
        }));
    }

    /// Drop the pending task, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebouncedScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}
