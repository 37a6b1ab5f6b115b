//! Token signing seam
//!
//! [`CredentialSigner`] is the boundary to the signing backend. Production
//! uses [`JwtSigner`]; tests script outcomes through [`MockSigner`].

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::error::SignerError;
use crate::session::SessionIdentity;

use super::Grants;

/// Claims embedded in a signed session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Signing key id
    pub iss: String,
    /// Participant identity
    pub sub: String,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
    /// Session the token is scoped to
    pub room: String,
    /// Capabilities granted by the token
    pub grants: Grants,
}

impl TokenClaims {
    /// Build claims for one credential issuance
    pub fn new(
        api_key: &str,
        identity: &SessionIdentity,
        issued_at: DateTime<Utc>,
        ttl_seconds: u64,
        grants: Grants,
    ) -> Self {
        Self {
            iss: api_key.to_string(),
            sub: identity.participant_id().to_string(),
            iat: issued_at.timestamp(),
            exp: issued_at.timestamp() + ttl_seconds as i64,
            room: identity.session_name().to_string(),
            grants,
        }
    }
}

/// Produces signed tokens for credential claims
#[async_trait]
pub trait CredentialSigner: Send + Sync {
    /// Sign the claims, returning the opaque token string
    async fn sign(&self, claims: &TokenClaims) -> Result<String, SignerError>;
}

/// HS256 JWT signer backed by the shared API secret
pub struct JwtSigner {
    key: EncodingKey,
}

impl JwtSigner {
    /// Create a signer from the configured secret
    pub fn new(api_secret: &str) -> Self {
        Self {
            key: EncodingKey::from_secret(api_secret.as_bytes()),
        }
    }
}

#[async_trait]
impl CredentialSigner for JwtSigner {
    async fn sign(&self, claims: &TokenClaims) -> Result<String, SignerError> {
        encode(&Header::default(), claims, &self.key)
            .map_err(|e| SignerError::Encoding(e.to_string()))
    }
}

/// Scriptable signer for tests
///
/// Queued outcomes are returned in order; once the queue is empty every call
/// succeeds with a generated token. Calls are counted so tests can assert how
/// many attempts the issuer made.
#[derive(Default)]
pub struct MockSigner {
    outcomes: Mutex<VecDeque<Result<String, SignerError>>>,
    calls: AtomicU32,
}

impl MockSigner {
    /// Create a mock signer that always succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful outcome with the given token
    pub fn queue_ok(&self, token: impl Into<String>) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Ok(token.into()));
    }

    /// Queue a transient failure
    pub fn queue_err(&self, message: impl Into<String>) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(SignerError::Unavailable(message.into())));
    }

    /// Queue `count` consecutive transient failures
    pub fn queue_failures(&self, count: u32) {
        for n in 0..count {
            self.queue_err(format!("transient failure {}", n + 1));
        }
    }

    /// Number of sign calls made so far
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialSigner for MockSigner {
    async fn sign(&self, claims: &TokenClaims) -> Result<String, SignerError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(outcome) = self.outcomes.lock().unwrap().pop_front() {
            return outcome;
        }
        Ok(format!("mock-token-{}-{}", claims.room, call))
    }
}
