//! Core error types.
//!
//! The routing path itself is infallible by design: a rule either fires or
//! it does not, and capability failures are absorbed into reply sentences
//! before they reach the router.  [`CoreError`] covers the few operations
//! that can still fail, with enough context that callers never need to
//! inspect opaque strings.

/// Unified error type for the Vox intent core.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A rule referenced a capability that is not in the registry.
    #[error("capability not found: {name}")]
    CapabilityNotFound { name: String },
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
