//! Vox intent-routing core.
//!
//! This crate is the deterministic half of the Vox assistant: it decides,
//! per utterance, whether a local capability handles the request and with
//! what extracted arguments.
//!
//! - **[`utterance`]** -- Lowercased, whitespace-tokenized view of user
//!   input; the only normalization in the pipeline.
//! - **[`rules`]** -- The ordered keyword rule set: trigger + extractor +
//!   capability reference per rule, evaluated with short-circuit semantics.
//! - **[`router`]** -- Walks the rule list and dispatches the first match;
//!   everything else is deferred to the conversational fallback.
//! - **[`capability`]** -- The capability trait, the tagged invocation
//!   outcome, and a [`DashMap`]-backed concurrent registry with a
//!   string-only, never-throws invocation contract.
//! - **[`error`]** -- Core error types via [`thiserror`].
//!
//! All public types are `Send + Sync` and designed for use within a
//! multi-threaded tokio runtime.
//!
//! [`DashMap`]: dashmap::DashMap

pub mod capability;
pub mod error;
pub mod router;
pub mod rules;
pub mod utterance;

// Re-export the most commonly used types at the crate root for convenience.
pub use capability::{Capability, CapabilityArgs, CapabilityInfo, CapabilityRegistry, Outcome};
pub use error::{CoreError, Result};
pub use router::{IntentRouter, RouteOutcome};
pub use rules::{Rule, RuleAction, default_rules};
pub use utterance::NormalizedUtterance;
