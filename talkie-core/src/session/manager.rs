//! Session lifecycle management
//!
//! The manager owns the session handle and drives the
//! Idle -> Connecting -> Active -> Idle state machine. Issuance is serialized
//! per handle: duplicate start requests are rejected while one is in flight
//! or a session is active, and teardown fences out any refresh that was
//! still running.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::credential::{Credential, CredentialIssuer};
use crate::error::SessionError;

use super::handle::{SessionHandle, SessionState};
use super::identity::SessionIdentity;
use super::refresh::{RefreshScheduler, RefreshSink};

struct Inner {
    state: SessionState,
    handle: Option<SessionHandle>,
}

/// Owns the session handle and coordinates issuance with the refresh timer
pub struct SessionManager {
    issuer: Arc<CredentialIssuer>,
    epoch: Arc<AtomicU64>,
    scheduler: StdMutex<RefreshScheduler>,
    inner: Arc<RwLock<Inner>>,
}

impl SessionManager {
    /// Create a manager for the issuer's configuration
    pub fn new(issuer: Arc<CredentialIssuer>) -> Self {
        let epoch = Arc::new(AtomicU64::new(0));
        let scheduler = StdMutex::new(RefreshScheduler::new(
            Arc::clone(&issuer),
            Arc::clone(&epoch),
        ));

        Self {
            issuer,
            epoch,
            scheduler,
            inner: Arc::new(RwLock::new(Inner {
                state: SessionState::Idle,
                handle: None,
            })),
        }
    }

    /// Start a session, issuing its first credential
    ///
    /// Rejected unless the manager is `Idle`, so at most one issuance is in
    /// flight per handle. The refresh scheduler starts only after the first
    /// credential lands; on failure the manager returns to `Idle` with the
    /// handle cleared.
    pub async fn connect(
        &self,
        session_name: Option<String>,
        participant_id: Option<String>,
    ) -> Result<SessionHandle, SessionError> {
        let identity = SessionIdentity::resolve(session_name, participant_id)?;

        {
            let mut inner = self.inner.write().await;
            if inner.state != SessionState::Idle {
                return Err(SessionError::InvalidState {
                    expected: "Idle".to_string(),
                    actual: inner.state.to_string(),
                });
            }
            inner.state = SessionState::Connecting;
        }
        debug!(session = %identity.session_name(), "session connecting");

        // A disconnect while issuance is in flight bumps the epoch; that
        // marks this connect as stale.
        let connect_epoch = self.epoch.load(Ordering::SeqCst);

        let endpoint = match self.issuer.config().endpoint() {
            Ok(endpoint) => endpoint,
            Err(err) => {
                self.abort_connect().await;
                return Err(SessionError::Issue(err.into()));
            }
        };

        match self.issuer.issue(&identity).await {
            Ok(credential) => {
                let handle = {
                    let mut inner = self.inner.write().await;
                    if self.epoch.load(Ordering::SeqCst) != connect_epoch
                        || inner.state != SessionState::Connecting
                    {
                        return Err(SessionError::Cancelled);
                    }

                    let mut handle = SessionHandle::new(identity.clone(), endpoint);
                    handle.credential = Some(credential);
                    inner.handle = Some(handle.clone());
                    inner.state = SessionState::Active;
                    handle
                };

                let sink: Arc<dyn RefreshSink> = Arc::new(HandleSink {
                    inner: Arc::clone(&self.inner),
                    epoch: Arc::clone(&self.epoch),
                });
                let generation = self
                    .scheduler
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .start(
                        identity.clone(),
                        self.issuer.config().refresh_interval(),
                        sink,
                    );

                // A teardown may have slipped in between activating the
                // handle and arming the timer; unwind our own timer if so.
                if self.inner.read().await.state != SessionState::Active {
                    let mut scheduler =
                        self.scheduler.lock().unwrap_or_else(PoisonError::into_inner);
                    if scheduler.generation() == generation {
                        scheduler.stop();
                    }
                    return Err(SessionError::Cancelled);
                }

                info!(
                    session = %identity.session_name(),
                    participant = %identity.participant_id(),
                    generation,
                    "session active"
                );
                Ok(handle)
            }
            Err(err) => {
                self.abort_connect().await;
                Err(err.into())
            }
        }
    }

    /// Tear the session down
    ///
    /// The scheduler stops before the handle clears, so no refresh can write
    /// into a torn-down handle. Idempotent.
    pub async fn disconnect(&self) {
        self.scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stop();

        let mut inner = self.inner.write().await;
        if inner.state != SessionState::Idle {
            debug!("session torn down");
        }
        inner.state = SessionState::Idle;
        inner.handle = None;
    }

    /// Current lifecycle state
    pub async fn state(&self) -> SessionState {
        self.inner.read().await.state
    }

    /// Snapshot of the current handle, if a session exists
    pub async fn handle(&self) -> Option<SessionHandle> {
        self.inner.read().await.handle.clone()
    }

    /// Whether the active credential is inside its validity window at `now`
    pub async fn has_valid_credential(&self, now: DateTime<Utc>) -> bool {
        self.inner
            .read()
            .await
            .handle
            .as_ref()
            .is_some_and(|handle| handle.has_valid_credential(now))
    }

    /// Whether the refresh timer is live
    pub fn is_refreshing(&self) -> bool {
        self.scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_running()
    }

    async fn abort_connect(&self) {
        let mut inner = self.inner.write().await;
        if inner.state == SessionState::Connecting {
            inner.state = SessionState::Idle;
            inner.handle = None;
        }
    }
}

/// Applies refreshed credentials to the handle, dropping stale generations
struct HandleSink {
    inner: Arc<RwLock<Inner>>,
    epoch: Arc<AtomicU64>,
}

#[async_trait]
impl RefreshSink for HandleSink {
    async fn on_refreshed(&self, generation: u64, credential: Credential) {
        let mut inner = self.inner.write().await;
        // Re-checked under the write lock: a teardown that won the lock
        // first has already bumped the epoch.
        if self.epoch.load(Ordering::SeqCst) != generation {
            return;
        }
        if inner.state == SessionState::Active {
            if let Some(handle) = inner.handle.as_mut() {
                handle.credential = Some(credential);
            }
        }
    }
}
