//! LLM provider integration.
//!
//! - **[`types`]** -- Provider-agnostic chat roles and messages.
//! - **[`client`]** -- Multi-provider non-streaming completion client.

pub mod client;
pub mod types;

pub use client::{LlmClient, LlmClientConfig, LlmProvider};
pub use types::{Message, Role};
