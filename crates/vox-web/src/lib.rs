//! HTTP surface for Vox.
//!
//! A small axum server exposing the assistant over four routes:
//!
//! - `POST /api/generate` -- `{prompt}` in, `{response}` out.
//! - `POST /api/reset` -- clear the conversation memory.
//! - `GET /api/status` -- version, uptime, capability count.
//! - `GET /api/capabilities` -- registered capabilities and descriptions.

pub mod api;
pub mod server;
pub mod state;

pub use server::{WebServer, default_system_prompt};
pub use state::AppState;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 8000,
        }
    }
}
