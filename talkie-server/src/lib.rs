//! talkie-server - HTTP surface for the talkie credential service
//!
//! This crate exposes the credentials endpoint clients call to obtain
//! `{endpoint, credential}` for a real-time session, plus a health endpoint.
//! The credential lifecycle itself lives in talkie-core.

mod error;
pub mod http;
mod state;

use std::sync::Arc;

use talkie_core::CredentialConfig;
use tokio::net::TcpListener;

pub use error::ServerError;
pub use http::create_router;
pub use state::AppState;

/// The talkie credential server
pub struct TalkieServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl TalkieServer {
    /// Create a server issuing credentials with the given configuration
    pub fn new(config: ServerConfig, credentials: CredentialConfig) -> Self {
        Self {
            config,
            state: Arc::new(AppState::new(credentials)),
        }
    }

    /// Create a server with custom state (for testing)
    pub fn with_state(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the shared application state
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Run the server, binding to the configured address
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.clone(),
                source: e,
            })?;

        tracing::info!("talkie server listening on {}", addr);
        if self.state.issuer.config().validate().is_err() {
            tracing::warn!(
                "credential issuance is not fully configured; /credentials will fail until \
                 TALKIE_API_KEY, TALKIE_API_SECRET, and TALKIE_SERVER_URL are set"
            );
        }

        let router = create_router(self.state);
        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7460,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfig with the specified host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the socket address string (e.g., "0.0.0.0:7460")
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 7460);
    }

    #[test]
    fn test_server_config_addr() {
        let config = ServerConfig::new("127.0.0.1", 8080);
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_talkie_server_new() {
        let config = ServerConfig::default();
        let server = TalkieServer::new(config.clone(), CredentialConfig::default());
        assert_eq!(server.config().addr(), config.addr());
    }

    #[test]
    fn test_talkie_server_with_state() {
        let config = ServerConfig::new("127.0.0.1", 9000);
        let state = Arc::new(AppState::new(CredentialConfig::default()));
        let server = TalkieServer::with_state(config, state);
        assert_eq!(server.config().port, 9000);
    }
}
