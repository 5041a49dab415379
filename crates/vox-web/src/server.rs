//! Web server setup and startup.
//!
//! [`WebServer`] composes the axum router, registers the API routes, and
//! starts the HTTP listener.

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use vox_agent::Responder;
use vox_core::CapabilityRegistry;

use crate::WebConfig;
use crate::api;
use crate::state::AppState;

/// The Vox web server.
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// # Arguments
    ///
    /// * `config` - Bind address and port configuration.
    /// * `capabilities` - The capability set the router dispatches to.
    /// * `responder` - The fallback responder shared across all requests.
    /// * `system_prompt` - Optional system prompt override.
    pub fn new(
        config: WebConfig,
        capabilities: CapabilityRegistry,
        responder: Arc<dyn Responder>,
        system_prompt: Option<String>,
    ) -> Self {
        let system_prompt = system_prompt.unwrap_or_else(default_system_prompt);
        let state = Arc::new(AppState::new(capabilities, responder, system_prompt));
        Self { config, state }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.bind_addr, self.config.port)
    }

    /// Build the axum router with all routes registered.
    fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin("*".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(tower_http::cors::Any);

        Router::new()
            .route("/api/generate", post(api::generate))
            .route("/api/reset", post(api::reset))
            .route("/api/status", get(api::status))
            .route("/api/capabilities", get(api::capabilities))
            .layer(cors)
            .with_state(Arc::clone(&self.state))
    }

    /// Start the server and block until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound.
    pub async fn start(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.addr();
        let router = self.router();

        tracing::info!(addr = %addr, "starting web server");

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

/// The default assistant identity, used when no override is configured.
pub fn default_system_prompt() -> String {
    "You are Vox, a helpful and intelligent voice assistant. \
     Keep your responses concise and conversational, suitable for a voice interface."
        .to_owned()
}
