//! Timer-owning debouncer.
//!
//! Each `schedule` call cancels the pending timer (if any) and starts a new
//! one; the action only runs once input has been quiet for the full window.
//! Must be used from inside a Tokio runtime.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace any pending timer with a new one that runs `action` after the window.
    ///
    /// Only the wait is cancellable. Once the window elapses the action runs
    /// to completion in its own task, so long-running work started by the
    /// action should be spawned separately if it must outlive a later
    /// `schedule`.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel_pending();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            action.await;
        }));
    }

    /// Drop the pending timer without running its action.
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                tracing::trace!("Debounce timer cancelled");
            }
            handle.abort();
        }
    }

    /// True while a timer is waiting (or its action is still running).
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
