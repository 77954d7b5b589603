//! Background eviction of expired tokens.
//!
//! The reaper is purely corrective: `validate` already deletes expired
//! entries lazily, so correctness never depends on the sweep running
//! promptly. The sweep only bounds how long dead entries can sit in the
//! maps between validations.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::media::MediaTokenStore;
use super::session::SessionTokenStore;

/// Fixed sweep period.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Cancellable periodic sweep over both token stores.
pub struct ExpiryReaper {
    handle: Mutex<Option<JoinHandle<()>>>,
    interval: Duration,
}

impl ExpiryReaper {
    pub fn new(interval: Duration) -> Self {
        Self {
            handle: Mutex::new(None),
            interval,
        }
    }

    /// Spawn the sweep task if it is not already running. Called on every
    /// token issuance (start-on-first-use); subsequent calls are no-ops.
    ///
    /// Outside a tokio runtime nothing is spawned; lazy eviction in
    /// `validate` remains the correctness path either way.
    pub fn ensure_started(&self, sessions: Arc<SessionTokenStore>, media: Arc<MediaTokenStore>) {
        let mut handle = self.handle.lock();
        if handle.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let interval = self.interval;
        *handle = Some(runtime.spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                let sessions_evicted = sessions.sweep_expired();
                let media_evicted = media.sweep_expired();
                if sessions_evicted + media_evicted > 0 {
                    tracing::debug!(
                        sessions_evicted,
                        media_evicted,
                        "expiry sweep evicted tokens"
                    );
                }
            }
        }));
    }

    /// Whether the sweep task is currently running.
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Cancel the sweep task. Safe to call when it was never started.
    pub fn shutdown(&self) {
        if let Some(task) = self.handle.lock().take() {
            task.abort();
        }
    }
}

impl Drop for ExpiryReaper {
    fn drop(&mut self) {
        self.shutdown();
    }
}
