//! Session handle and lifecycle states

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::credential::Credential;

use super::SessionIdentity;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No session
    Idle,
    /// Issuance in flight for the initial credential
    Connecting,
    /// Credential present, refresh scheduler running
    Active,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Connecting => write!(f, "Connecting"),
            SessionState::Active => write!(f, "Active"),
        }
    }
}

/// Externally observed session state
///
/// Owned by the [`SessionManager`](super::SessionManager); hosts read
/// snapshots to establish or re-establish a transport connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHandle {
    /// Identity the credential is scoped to
    pub identity: SessionIdentity,
    /// Real-time endpoint to connect to
    pub endpoint: Url,
    /// Active credential, absent until the first issuance lands
    pub credential: Option<Credential>,
}

impl SessionHandle {
    /// Create a handle with no credential yet
    pub fn new(identity: SessionIdentity, endpoint: Url) -> Self {
        Self {
            identity,
            endpoint,
            credential: None,
        }
    }

    /// Whether a credential is present and inside its validity window
    ///
    /// Presence alone is not validity; a credential past its ttl counts as
    /// absent even if it was never explicitly replaced.
    pub fn has_valid_credential(&self, now: DateTime<Utc>) -> bool {
        self.credential
            .as_ref()
            .is_some_and(|credential| credential.is_valid_at(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Grants;
    use chrono::Duration as ChronoDuration;

    fn handle() -> SessionHandle {
        SessionHandle::new(
            SessionIdentity::new("room-42", "user-7").unwrap(),
            Url::parse("wss://rtc.example.com").unwrap(),
        )
    }

    #[test]
    fn new_handle_has_no_credential() {
        let handle = handle();
        assert!(handle.credential.is_none());
        assert!(!handle.has_valid_credential(Utc::now()));
    }

    #[test]
    fn valid_credential_is_detected() {
        let mut handle = handle();
        let issued_at = Utc::now();
        handle.credential = Some(Credential {
            token: "t".to_string(),
            issued_at,
            ttl_seconds: 1800,
            grants: Grants::voice_session(),
        });

        assert!(handle.has_valid_credential(issued_at + ChronoDuration::seconds(240)));
    }

    #[test]
    fn expired_credential_counts_as_absent() {
        let mut handle = handle();
        let issued_at = Utc::now();
        handle.credential = Some(Credential {
            token: "t".to_string(),
            issued_at,
            ttl_seconds: 1800,
            grants: Grants::voice_session(),
        });

        assert!(!handle.has_valid_credential(issued_at + ChronoDuration::seconds(1801)));
    }

    #[test]
    fn state_display_matches_labels() {
        assert_eq!(SessionState::Idle.to_string(), "Idle");
        assert_eq!(SessionState::Connecting.to_string(), "Connecting");
        assert_eq!(SessionState::Active.to_string(), "Active");
    }
}
