//! talkie-core: session-credential lifecycle for real-time voice sessions
//!
//! This crate provides the components a host needs to keep a long-lived
//! real-time session authorized:
//!
//! - **Credential issuance** - [`CredentialIssuer`] mints signed,
//!   time-bounded credentials, retrying transient signer failures with
//!   exponential backoff
//! - **Refresh scheduling** - [`RefreshScheduler`] re-issues the active
//!   credential before it expires
//! - **Session lifecycle** - [`SessionManager`] owns the [`SessionHandle`]
//!   and drives Idle -> Connecting -> Active -> Idle
//!
//! The real-time media transport itself is an external collaborator: this
//! crate only produces the `{endpoint, credential}` pair it needs.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use talkie_core::{CredentialConfig, CredentialIssuer, SessionManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CredentialConfig::from_env();
//! let issuer = Arc::new(CredentialIssuer::new(config));
//! let manager = SessionManager::new(issuer);
//!
//! let handle = manager.connect(Some("room-42".to_string()), None).await?;
//! if let Some(credential) = &handle.credential {
//!     println!("join {} with {}", handle.endpoint, credential.token);
//! }
//!
//! // ... later
//! manager.disconnect().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credential;
pub mod error;
pub mod retry;
pub mod session;

// Re-export key types for convenience
pub use config::CredentialConfig;
pub use credential::{
    Credential, CredentialIssuer, CredentialSigner, Grants, JwtSigner, MockSigner, TokenClaims,
};
pub use error::{
    ConfigError, IdentityError, IssueError, SessionError, SignerError, TalkieError,
};
pub use retry::RetryPolicy;
pub use session::{
    RefreshScheduler, RefreshSink, SessionHandle, SessionIdentity, SessionManager, SessionState,
};
