//! Refresh scheduler
//!
//! Re-issues the active credential on a fixed interval so a long-lived
//! session never outlives its token. One timer task runs at a time; an epoch
//! counter invalidates stale runs so an old timer can never deliver into a
//! newer session.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::credential::{Credential, CredentialIssuer};

use super::SessionIdentity;

/// Receives refreshed credentials from the scheduler
///
/// `generation` identifies the timer run that produced the credential. Sinks
/// must re-check it against the current epoch before applying the result, so
/// a refresh that raced a teardown is dropped instead of written.
#[async_trait]
pub trait RefreshSink: Send + Sync {
    /// Called after each successful scheduled issuance
    async fn on_refreshed(&self, generation: u64, credential: Credential);
}

/// Drives periodic credential re-issuance for one session at a time
pub struct RefreshScheduler {
    issuer: Arc<CredentialIssuer>,
    epoch: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Create a scheduler sharing the given epoch counter
    pub fn new(issuer: Arc<CredentialIssuer>, epoch: Arc<AtomicU64>) -> Self {
        Self {
            issuer,
            epoch,
            task: None,
        }
    }

    /// Arm the timer for `identity`, stopping any previous timer first
    ///
    /// Returns the generation of this run; only refreshes carrying it are
    /// applied by a well-behaved sink.
    pub fn start(
        &mut self,
        identity: SessionIdentity,
        interval: Duration,
        sink: Arc<dyn RefreshSink>,
    ) -> u64 {
        self.stop();

        let generation = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let issuer = Arc::clone(&self.issuer);
        let epoch = Arc::clone(&self.epoch);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A tick that lands while a refresh is still in flight is
            // skipped, never queued, so issuance calls cannot pile up.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the initial credential
            // was already issued by whoever started the schedule.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if epoch.load(Ordering::SeqCst) != generation {
                    break;
                }
                match issuer.issue(&identity).await {
                    Ok(credential) => {
                        if epoch.load(Ordering::SeqCst) != generation {
                            break;
                        }
                        debug!(
                            session = %identity.session_name(),
                            generation,
                            "credential refreshed"
                        );
                        sink.on_refreshed(generation, credential).await;
                    }
                    Err(err) => {
                        // Non-fatal: the previous credential may still be
                        // valid for several minutes, so keep the schedule
                        // running and let the next tick try again.
                        warn!(
                            session = %identity.session_name(),
                            error = %err,
                            "credential refresh failed"
                        );
                    }
                }
            }
        });

        self.task = Some(task);
        generation
    }

    /// Stop the timer; a no-op when nothing is armed
    ///
    /// Bumping the epoch here also invalidates any refresh (or connect)
    /// already in flight.
    pub fn stop(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether a timer task is currently live
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Current epoch value
    pub fn generation(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
