//! Deferred follow-up messages.
//!
//! Some commands acknowledge immediately and deliver their result a few
//! seconds later. Those deliveries run as tasks owned by the scheduler so
//! they outlive the HTTP request but not the process: on shutdown pending
//! follow-ups are cancelled, and nothing new is accepted.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Owner of all pending follow-up tasks.
#[derive(Debug, Default)]
pub struct FollowUpScheduler {
    tracker: TaskTracker,
    token: CancellationToken,
}

impl FollowUpScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`.
    ///
    /// Returns `false` (and drops the task) once shutdown has begun.
    pub fn schedule<F>(&self, label: &str, delay: Duration, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.token.is_cancelled() {
            warn!(target_chat = %label, "Follow-up dropped: shutting down");
            return false;
        }

        debug!(target_chat = %label, delay_ms = delay.as_millis() as u64, "Follow-up scheduled");
        let token = self.token.clone();
        let label = label.to_string();
        self.tracker.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    info!(target_chat = %label, "Follow-up cancelled by shutdown");
                }
                _ = tokio::time::sleep(delay) => {
                    task.await;
                    debug!(target_chat = %label, "Follow-up delivered");
                }
            }
        });
        true
    }

    /// Number of follow-ups not yet finished.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel pending follow-ups and wait up to `grace` for in-flight sends.
    ///
    /// Returns `true` if every task finished within the grace period.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        let pending = self.pending();
        if pending > 0 {
            info!(pending, "Cancelling pending follow-ups");
        }
        self.token.cancel();
        self.tracker.close();

        match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(remaining = self.pending(), "Follow-ups still running after grace period");
                false
            }
        }
    }
}
