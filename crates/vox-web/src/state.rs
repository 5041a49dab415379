//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers.  The conversation memory is the one piece of mutable state;
//! it sits behind a [`tokio::sync::Mutex`] and every mutation (append,
//! truncate, reset) happens under that single lock.  On the fallback path
//! the guard is held across the whole append-complete-append sequence, so
//! concurrent requests serialize and each sees a consistent buffer.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use vox_agent::{ConversationMemory, Responder};
use vox_core::{CapabilityRegistry, IntentRouter};

/// Shared state accessible from every axum handler.
pub struct AppState {
    /// The intent router over the capability set.
    pub router: IntentRouter,

    /// The capability registry, for discovery endpoints.
    pub capabilities: CapabilityRegistry,

    /// The conversation memory feeding the fallback responder.
    pub memory: Mutex<ConversationMemory>,

    /// The fallback responder (an LLM client in production).
    pub responder: Arc<dyn Responder>,

    /// Server start time, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Assemble the state for a capability set and responder.
    pub fn new(
        capabilities: CapabilityRegistry,
        responder: Arc<dyn Responder>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            router: IntentRouter::new(capabilities.clone()),
            capabilities,
            memory: Mutex::new(ConversationMemory::new(system_prompt)),
            responder,
            started_at: Instant::now(),
        }
    }
}
