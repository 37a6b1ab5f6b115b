//! Shared application state for the talkie server

use std::sync::Arc;

use chrono::{DateTime, Utc};
use talkie_core::{CredentialConfig, CredentialIssuer};

/// Shared application state accessible by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Credential issuer backing the credentials endpoint
    pub issuer: Arc<CredentialIssuer>,
    /// When the server started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create state with the production JWT signer
    pub fn new(config: CredentialConfig) -> Self {
        Self::with_issuer(Arc::new(CredentialIssuer::new(config)))
    }

    /// Create state around an existing issuer (for testing with a scripted
    /// signer)
    pub fn with_issuer(issuer: Arc<CredentialIssuer>) -> Self {
        Self {
            issuer,
            started_at: Utc::now(),
        }
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
