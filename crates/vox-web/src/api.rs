//! REST API route handlers.
//!
//! `POST /api/generate` is the main entry point: route the prompt through
//! the rule engine, and only when no rule fires take the conversational
//! fallback.  Capability failures never reach this layer as errors — they
//! arrive as reply sentences — so the only error response this API produces
//! is a failed fallback completion.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use vox_agent::fallback_exchange;
use vox_core::{CapabilityInfo, RouteOutcome};

use crate::state::AppState;

/// Confirmation returned by the reset endpoint.
pub const RESET_REPLY: &str = "Conversation memory cleared.";

// ---------------------------------------------------------------------------
// POST /api/generate
// ---------------------------------------------------------------------------

/// Request body for the generate endpoint.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    /// The user utterance.
    pub prompt: String,
}

/// Handle one utterance: rule match or conversational fallback.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateBody>,
) -> (StatusCode, Json<Value>) {
    let request_id = Uuid::now_v7();
    tracing::info!(%request_id, prompt_len = body.prompt.len(), "generate request");

    match state.router.route(&body.prompt).await {
        RouteOutcome::Handled(response) => {
            // A rule fired; the conversation memory is untouched.
            tracing::info!(%request_id, "handled by rule");
            (StatusCode::OK, Json(json!({ "response": response })))
        }
        RouteOutcome::Unhandled => {
            let mut memory = state.memory.lock().await;
            match fallback_exchange(&mut memory, state.responder.as_ref(), &body.prompt).await {
                Ok(response) => {
                    tracing::info!(%request_id, turns = memory.len(), "handled by fallback");
                    (StatusCode::OK, Json(json!({ "response": response })))
                }
                Err(e) => {
                    tracing::error!(%request_id, error = %e, "fallback completion failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "error": "language model request failed",
                            "detail": e.to_string(),
                        })),
                    )
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// POST /api/reset
// ---------------------------------------------------------------------------

/// Clear the conversation memory back to its single system turn.
pub async fn reset(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.memory.lock().await.reset();
    tracing::info!("conversation memory reset via api");
    Json(json!({ "response": RESET_REPLY }))
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Response payload for the status endpoint.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub capability_count: usize,
    pub rule_count: usize,
}

/// Return basic liveness information.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        capability_count: state.capabilities.count(),
        rule_count: state.router.rule_count(),
    })
}

// ---------------------------------------------------------------------------
// GET /api/capabilities
// ---------------------------------------------------------------------------

/// List all registered capabilities and their descriptions.
pub async fn capabilities(State(state): State<Arc<AppState>>) -> Json<Vec<CapabilityInfo>> {
    Json(state.capabilities.list())
}
