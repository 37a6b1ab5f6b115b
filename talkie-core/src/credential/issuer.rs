//! Credential issuance with retry

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::CredentialConfig;
use crate::error::IssueError;
use crate::retry::RetryPolicy;
use crate::session::SessionIdentity;

use super::{Credential, CredentialSigner, Grants, JwtSigner, TokenClaims};

/// Issues signed, time-bounded credentials for session identities
///
/// The ttl and grant set are fixed by configuration; callers cannot extend a
/// credential per-call, only replace it through a scheduled refresh.
pub struct CredentialIssuer {
    config: CredentialConfig,
    signer: Arc<dyn CredentialSigner>,
    retry: RetryPolicy,
}

impl CredentialIssuer {
    /// Create an issuer backed by the HS256 JWT signer
    pub fn new(config: CredentialConfig) -> Self {
        let signer = Arc::new(JwtSigner::new(&config.api_secret));
        Self::with_signer(config, signer, RetryPolicy::default_policy())
    }

    /// Create an issuer with a custom signer and retry policy
    pub fn with_signer(
        config: CredentialConfig,
        signer: Arc<dyn CredentialSigner>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            config,
            signer,
            retry,
        }
    }

    /// The issuer configuration
    pub fn config(&self) -> &CredentialConfig {
        &self.config
    }

    /// Issue a credential for the identity
    ///
    /// Configuration is validated before the signer is touched; a missing
    /// key, secret, or URL fails immediately and is never retried. Transient
    /// signer failures are retried with exponential backoff until the policy
    /// gives up, at which point the last cause is surfaced. No state is
    /// mutated before success.
    pub async fn issue(&self, identity: &SessionIdentity) -> Result<Credential, IssueError> {
        self.config.validate()?;

        let ttl_seconds = self.config.token_ttl_secs;
        let grants = Grants::voice_session();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let issued_at = Utc::now();
            let claims = TokenClaims::new(
                &self.config.api_key,
                identity,
                issued_at,
                ttl_seconds,
                grants,
            );

            match self.signer.sign(&claims).await {
                Ok(token) => {
                    debug!(
                        session = %identity.session_name(),
                        participant = %identity.participant_id(),
                        attempt,
                        "credential issued"
                    );
                    return Ok(Credential {
                        token,
                        issued_at,
                        ttl_seconds,
                        grants,
                    });
                }
                Err(err) => match self.retry.backoff(attempt) {
                    Some(delay) => {
                        warn!(
                            session = %identity.session_name(),
                            attempt,
                            error = %err,
                            "credential issuance failed, retrying in {:?}",
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        return Err(IssueError::Issuance {
                            attempts: attempt,
                            source: err,
                        });
                    }
                },
            }
        }
    }
}
