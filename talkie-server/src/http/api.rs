//! REST API handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use talkie_core::{Credential, IdentityError, IssueError, SessionIdentity};
use thiserror::Error;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the server
    pub status: String,
    /// Server version
    pub version: String,
    /// Seconds since server started
    pub uptime_seconds: i64,
    /// Whether credential issuance is fully configured
    pub configured: bool,
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        configured: state.issuer.config().validate().is_ok(),
    })
}

/// Query parameters for the credentials endpoint; both are optional and
/// generated when absent
#[derive(Debug, Deserialize)]
pub struct CredentialsQuery {
    pub session: Option<String>,
    pub participant: Option<String>,
}

/// Everything a client needs to join the session
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    /// Real-time endpoint to connect to
    pub server_url: String,
    /// Session the credential is scoped to
    pub session_name: String,
    /// Participant the credential was issued for
    pub participant_id: String,
    /// The issued credential
    pub credential: Credential,
}

/// GET /credentials - issue a credential for a (possibly generated) identity
pub async fn connection_details(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CredentialsQuery>,
) -> Result<Response, ApiError> {
    let identity = SessionIdentity::resolve(query.session, query.participant)?;

    let credential = state.issuer.issue(&identity).await?;

    let details = ConnectionDetails {
        server_url: state.issuer.config().server_url.clone(),
        session_name: identity.session_name().to_string(),
        participant_id: identity.participant_id().to_string(),
        credential,
    };

    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(identity.session_name()) {
        Ok(value) => {
            headers.insert(HeaderName::from_static("x-session-name"), value);
        }
        Err(_) => tracing::debug!(
            session = %identity.session_name(),
            "session name is not a valid header value, omitting x-session-name"
        ),
    }
    match HeaderValue::from_str(identity.participant_id()) {
        Ok(value) => {
            headers.insert(HeaderName::from_static("x-participant-id"), value);
        }
        Err(_) => tracing::debug!(
            participant = %identity.participant_id(),
            "participant id is not a valid header value, omitting x-participant-id"
        ),
    }

    Ok((StatusCode::OK, headers, Json(details)).into_response())
}

/// Error responses for the credentials endpoint
///
/// Validation problems are the caller's fault (400); configuration and
/// issuance failures are the operator's (500). Bodies are plain text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] IdentityError),

    #[error("{0}")]
    Issue(#[from] IssueError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Issue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(status = %status, error = %self, "credentials request failed");
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::create_router;
    use axum_test::TestServer;
    use std::time::Duration;
    use talkie_core::{CredentialConfig, CredentialIssuer, MockSigner, RetryPolicy};

    fn test_server_with(config: CredentialConfig, signer: Arc<MockSigner>) -> TestServer {
        // Millisecond backoff keeps retry-exhaustion tests fast
        let issuer = Arc::new(CredentialIssuer::with_signer(
            config,
            signer,
            RetryPolicy::new(3, Duration::from_millis(1)),
        ));
        let state = Arc::new(AppState::with_issuer(issuer));
        TestServer::new(create_router(state)).unwrap()
    }

    fn test_server(signer: Arc<MockSigner>) -> TestServer {
        test_server_with(
            CredentialConfig::new("key", "secret", "wss://rtc.example.com"),
            signer,
        )
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = test_server(Arc::new(MockSigner::new()));

        let response = server.get("/api/health").await;
        response.assert_status_ok();

        let body: HealthResponse = response.json();
        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
        assert!(body.configured);
    }

    #[tokio::test]
    async fn test_health_reports_unconfigured() {
        let server = test_server_with(CredentialConfig::default(), Arc::new(MockSigner::new()));

        let body: HealthResponse = server.get("/api/health").await.json();
        assert!(!body.configured);
    }

    #[tokio::test]
    async fn test_credentials_with_explicit_identity() {
        let server = test_server(Arc::new(MockSigner::new()));

        let response = server
            .get("/credentials")
            .add_query_param("session", "room-42")
            .add_query_param("participant", "user-7")
            .await;
        response.assert_status_ok();

        let body: ConnectionDetails = response.json();
        assert_eq!(body.server_url, "wss://rtc.example.com");
        assert_eq!(body.session_name, "room-42");
        assert_eq!(body.participant_id, "user-7");
        assert_eq!(body.credential.ttl_seconds, 1800);
        assert!(body.credential.grants.is_full());
    }

    #[tokio::test]
    async fn test_credentials_sets_identity_headers() {
        let server = test_server(Arc::new(MockSigner::new()));

        let response = server
            .get("/credentials")
            .add_query_param("session", "room-42")
            .add_query_param("participant", "user-7")
            .await;

        assert_eq!(
            response.headers().get("x-session-name").unwrap(),
            "room-42"
        );
        assert_eq!(
            response.headers().get("x-participant-id").unwrap(),
            "user-7"
        );
    }

    #[tokio::test]
    async fn test_non_ascii_identity_omits_header_but_succeeds() {
        let server = test_server(Arc::new(MockSigner::new()));

        let response = server
            .get("/credentials")
            .add_query_param("session", "café-42")
            .add_query_param("participant", "user-7")
            .await;
        response.assert_status_ok();

        // The body still carries the name; only the header is dropped
        let body: ConnectionDetails = response.json();
        assert_eq!(body.session_name, "café-42");
        assert!(response.headers().get("x-session-name").is_none());
        assert_eq!(
            response.headers().get("x-participant-id").unwrap(),
            "user-7"
        );
    }

    #[tokio::test]
    async fn test_credentials_generates_missing_identity() {
        let server = test_server(Arc::new(MockSigner::new()));

        let response = server.get("/credentials").await;
        response.assert_status_ok();

        let body: ConnectionDetails = response.json();
        assert!(body.session_name.starts_with("room_"));
        assert!(body.participant_id.starts_with("user_"));
    }

    #[tokio::test]
    async fn test_blank_session_is_bad_request() {
        let server = test_server(Arc::new(MockSigner::new()));

        let response = server
            .get("/credentials")
            .add_query_param("session", "   ")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_config_is_server_error_without_signing() {
        let signer = Arc::new(MockSigner::new());
        let server = test_server_with(CredentialConfig::default(), signer.clone());

        let response = server.get("/credentials").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(signer.calls(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_issuance_is_server_error() {
        let signer = Arc::new(MockSigner::new());
        signer.queue_failures(3);
        let server = test_server(signer.clone());

        let response = server.get("/credentials").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(signer.calls(), 3);
    }
}
