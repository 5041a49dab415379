//! Vox conversational fallback.
//!
//! Everything the assistant needs when no rule handles an utterance:
//!
//! - **[`llm`]** -- Chat message types and a multi-provider, non-streaming
//!   completion client (Groq by default, any OpenAI-compatible endpoint, or
//!   Anthropic).
//! - **[`memory`]** -- The bounded conversation buffer: one pinned system
//!   turn plus the most recent tail, truncated eagerly on append.
//! - **[`exchange`]** -- The append-complete-append sequence around one
//!   fallback call, behind the [`Responder`] seam.
//! - **[`error`]** -- Agent error types via [`thiserror`].

pub mod error;
pub mod exchange;
pub mod llm;
pub mod memory;

// Re-export the most commonly used types at the crate root for convenience.
pub use error::{AgentError, Result};
pub use exchange::{Responder, fallback_exchange};
pub use llm::{LlmClient, LlmClientConfig, LlmProvider, Message, Role};
pub use memory::{ConversationMemory, MAX_HISTORY};
