//! Session identity

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IdentityError;

/// The (session name, participant id) pair that scopes a credential
///
/// Immutable once a session starts. Both parts must be non-empty; either can
/// be generated when the caller does not supply one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    session_name: String,
    participant_id: String,
}

impl SessionIdentity {
    /// Create an identity from caller-supplied parts
    ///
    /// Both parts are trimmed; blank input is rejected.
    pub fn new(
        session_name: impl Into<String>,
        participant_id: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let session_name = session_name.into().trim().to_string();
        let participant_id = participant_id.into().trim().to_string();

        if session_name.is_empty() {
            return Err(IdentityError::EmptySessionName);
        }
        if participant_id.is_empty() {
            return Err(IdentityError::EmptyParticipantId);
        }

        Ok(Self {
            session_name,
            participant_id,
        })
    }

    /// Generate a fresh identity with time-based names and random suffixes
    pub fn generate() -> Self {
        Self {
            session_name: generated_name("room"),
            participant_id: generated_name("user"),
        }
    }

    /// Build an identity from optional caller input, generating missing parts
    ///
    /// Absent parts are generated; present-but-blank parts are rejected.
    pub fn resolve(
        session_name: Option<String>,
        participant_id: Option<String>,
    ) -> Result<Self, IdentityError> {
        let session_name = match session_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            Some(_) => return Err(IdentityError::EmptySessionName),
            None => generated_name("room"),
        };
        let participant_id = match participant_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            Some(_) => return Err(IdentityError::EmptyParticipantId),
            None => generated_name("user"),
        };

        Ok(Self {
            session_name,
            participant_id,
        })
    }

    /// The session this identity is scoped to
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// The participant within the session
    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }
}

fn generated_name(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, millis, &suffix[..8])
}
