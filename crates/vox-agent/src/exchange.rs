//! The fallback exchange.
//!
//! When no rule handles an utterance, the request takes the conversational
//! path: append the user turn to memory, hand the full (already-truncated)
//! buffer to the responder, append the assistant turn it returns.  The
//! ordering is a contract — the responder must see the user turn it is
//! answering, and a failed call leaves that user turn in memory (no
//! rollback) while the error propagates to the caller.
//!
//! [`Responder`] is the seam to the external collaborator: production wires
//! in [`LlmClient`], tests substitute a stub.

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::client::LlmClient;
use crate::llm::types::Message;
use crate::memory::ConversationMemory;

/// The external collaborator that turns a conversation into one assistant
/// turn.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce the next assistant turn for the given history.
    async fn complete(&self, history: &[Message]) -> Result<Message>;
}

#[async_trait]
impl Responder for LlmClient {
    async fn complete(&self, history: &[Message]) -> Result<Message> {
        LlmClient::complete(self, history).await
    }
}

/// Run one fallback exchange against `memory` and return the reply text.
///
/// # Errors
///
/// Propagates the responder's failure untouched.  The user turn appended
/// before the call stays in memory.
pub async fn fallback_exchange<R>(
    memory: &mut ConversationMemory,
    responder: &R,
    utterance: &str,
) -> Result<String>
where
    R: Responder + ?Sized,
{
    memory.append(Message::user(utterance));

    let history = memory.snapshot();
    let reply = responder.complete(&history).await?;

    let text = reply.content.clone();
    memory.append(reply);

    tracing::debug!(turns = memory.len(), "fallback exchange complete");
    Ok(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
