//! Agent error types.
//!
//! Every failure on the fallback path surfaces through [`AgentError`].
//! Capability-style absorption does not apply here: a failed completion is
//! the one class of error the assistant reports to its caller as an error,
//! with the transport detail attached.

/// Unified error type for the Vox fallback responder.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// No API key was configured for the selected provider.
    #[error("no API key configured for provider: {provider}")]
    MissingApiKey { provider: String },

    /// The completion request could not be sent or the response body could
    /// not be read (network, DNS, TLS, timeout).
    #[error("completion request failed: {reason}")]
    RequestFailed { reason: String },

    /// The provider answered with a non-success status (auth, quota, rate
    /// limit, server error).
    #[error("provider returned {status}: {detail}")]
    Api { status: u16, detail: String },

    /// The provider answered 2xx but the body did not have the expected
    /// shape.
    #[error("could not parse completion response: {reason}")]
    ParseFailed { reason: String },
}

/// Convenience alias used throughout the agent crate.
pub type Result<T> = std::result::Result<T, AgentError>;
