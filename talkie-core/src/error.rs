//! Error types for talkie-core

use thiserror::Error;

/// Top-level error type for talkie-core
#[derive(Error, Debug)]
pub enum TalkieError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Issuance error: {0}")]
    Issue(#[from] IssueError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Operator configuration is missing or unusable
///
/// These are fatal to the request that hits them and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("signing key is not configured")]
    MissingApiKey,

    #[error("signing secret is not configured")]
    MissingApiSecret,

    #[error("server URL is not configured")]
    MissingServerUrl,

    #[error("server URL is not a valid URL: {0}")]
    InvalidServerUrl(String),
}

/// Bad caller input when building a session identity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("session name must not be empty")]
    EmptySessionName,

    #[error("participant id must not be empty")]
    EmptyParticipantId,
}

/// Failures reported by the signing backend
#[derive(Error, Debug, Clone)]
pub enum SignerError {
    #[error("token encoding failed: {0}")]
    Encoding(String),

    #[error("signing backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors from credential issuance
#[derive(Error, Debug)]
pub enum IssueError {
    /// Operator error, surfaced immediately without touching the signer
    #[error("credential service is not configured: {0}")]
    Configuration(#[from] ConfigError),

    /// Transient backend failure that survived every retry
    #[error("credential issuance failed after {attempts} attempts: {source}")]
    Issuance {
        attempts: u32,
        #[source]
        source: SignerError,
    },
}

/// Errors from session lifecycle management
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    #[error("session was torn down while connecting")]
    Cancelled,

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Issuance error: {0}")]
    Issue(#[from] IssueError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_missing_key_displays_correctly() {
        let error = ConfigError::MissingApiKey;
        assert!(error.to_string().contains("signing key"));
    }

    #[test]
    fn config_error_invalid_url_displays_correctly() {
        let error = ConfigError::InvalidServerUrl("not a url".to_string());
        assert!(error.to_string().contains("not a url"));
    }

    #[test]
    fn identity_error_displays_correctly() {
        let error = IdentityError::EmptySessionName;
        assert_eq!(error.to_string(), "session name must not be empty");
    }

    #[test]
    fn issue_error_issuance_displays_attempts() {
        let error = IssueError::Issuance {
            attempts: 3,
            source: SignerError::Unavailable("backend down".to_string()),
        };
        assert!(error.to_string().contains("3 attempts"));
    }

    #[test]
    fn issue_error_converts_from_config_error() {
        let error: IssueError = ConfigError::MissingApiSecret.into();
        assert!(matches!(error, IssueError::Configuration(_)));
    }

    #[test]
    fn session_error_invalid_state_displays_correctly() {
        let error = SessionError::InvalidState {
            expected: "Idle".to_string(),
            actual: "Active".to_string(),
        };
        assert!(error.to_string().contains("expected Idle"));
        assert!(error.to_string().contains("got Active"));
    }

    #[test]
    fn session_error_converts_from_issue_error() {
        let issue_error = IssueError::Issuance {
            attempts: 1,
            source: SignerError::Encoding("bad key".to_string()),
        };
        let session_error: SessionError = issue_error.into();
        assert!(matches!(session_error, SessionError::Issue(_)));
    }

    #[test]
    fn talkie_error_converts_from_session_error() {
        let session_error = SessionError::Cancelled;
        let talkie_error: TalkieError = session_error.into();
        assert!(matches!(talkie_error, TalkieError::Session(_)));
    }
}
