//! Capability trait, invocation outcome, and concurrent registry.
//!
//! A capability is a named automation operation with a string-only result
//! contract: whatever happens underneath (process spawn failure, missing
//! host session, unknown target), the caller gets back a human-readable
//! sentence and never an error.  Internally every capability reports a
//! tagged [`Outcome`] so tests can distinguish success from failure; the
//! registry flattens it to the sentence at the boundary.
//!
//! The registry is backed by [`DashMap`] which provides lock-free concurrent
//! reads and fine-grained write locking, making it safe to share across
//! request handlers without a global `RwLock`.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

// ---------------------------------------------------------------------------
// Capability names
// ---------------------------------------------------------------------------

/// Registry keys for the built-in capability set.  Rules reference these
/// constants so a rename cannot silently detach a rule from its capability.
pub mod names {
    pub const APP_OPEN: &str = "app_open";
    pub const APP_CLOSE: &str = "app_close";
    pub const WEB_SEARCH: &str = "web_search";
    pub const VOLUME_SET: &str = "volume_set";
    pub const VOLUME_MUTE: &str = "volume_mute";
    pub const BRIGHTNESS_SET: &str = "brightness_set";
    pub const LOCK: &str = "lock";
    pub const SCREENSHOT: &str = "screenshot";
    pub const MINIMIZE: &str = "minimize";
    pub const TYPE_TEXT: &str = "type_text";
    pub const SHUTDOWN: &str = "shutdown";
}

// ---------------------------------------------------------------------------
// Arguments and outcome
// ---------------------------------------------------------------------------

/// Arguments extracted by a rule and handed to a capability.
///
/// Extraction is positional and textual, so arguments are loose by design:
/// a free-text field (app name, search query, text to type) and an integer
/// level (volume, brightness).  A capability reads the fields it needs and
/// ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityArgs {
    /// Free-text argument (app name, query, text to type).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Integer level argument (volume or brightness percentage).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl CapabilityArgs {
    /// No arguments.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A free-text argument.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// An integer level argument.
    #[must_use]
    pub fn level(level: u32) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }
}

/// The tagged result of one capability invocation.
///
/// Both variants carry a complete reply sentence; the tag records whether
/// the underlying action succeeded.  [`Outcome::into_sentence`] erases the
/// tag at the boundary, preserving the never-throws contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The capability handled the request and produced a reply.
    Done(String),
    /// The underlying action failed; the reason is already phrased as a
    /// reply sentence.
    Failed(String),
}

impl Outcome {
    /// Flatten the outcome into the user-facing sentence.
    #[must_use]
    pub fn into_sentence(self) -> String {
        match self {
            Self::Done(sentence) | Self::Failed(sentence) => sentence,
        }
    }

    /// Whether the underlying action succeeded.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

/// A named automation operation.
///
/// Implementations must never panic and never return an error: any internal
/// failure is converted into [`Outcome::Failed`] with a human-readable
/// sentence.  Invocations are fire-and-forget from the router's point of
/// view — no retry, no timeout at this layer.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Registry key for this capability (one of [`names`]).
    fn name(&self) -> &str;

    /// Human-readable description of what the capability does.
    fn description(&self) -> &str;

    /// Perform the operation with the extracted arguments.
    async fn invoke(&self, args: CapabilityArgs) -> Outcome;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Reply used when a rule names a capability the registry does not hold.
const UNKNOWN_CAPABILITY_REPLY: &str = "Sorry, I can't do that yet.";

/// Summary of a registered capability, for discovery endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityInfo {
    pub name: String,
    pub description: String,
}

/// Concurrent capability registry backed by [`DashMap`].
///
/// The registry is cheaply cloneable (`Arc`-backed) and `Send + Sync`.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    inner: Arc<DashMap<String, Arc<dyn Capability>>>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability under its own name.
    ///
    /// If a capability with the same name already exists, it is replaced.
    pub fn register(&self, capability: Arc<dyn Capability>) {
        let name = capability.name().to_owned();
        tracing::info!(capability = %name, "capability registered");
        self.inner.insert(name, capability);
    }

    /// Look up a capability by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Capability>> {
        self.inner
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| CoreError::CapabilityNotFound {
                name: name.to_owned(),
            })
    }

    /// Invoke a capability by name, flattening the outcome to a sentence.
    ///
    /// Never fails: an unknown name or a failed action both come back as a
    /// reply sentence, per the string-only contract.
    pub async fn invoke(&self, name: &str, args: CapabilityArgs) -> String {
        match self.get(name) {
            Ok(capability) => {
                let outcome = capability.invoke(args).await;
                if let Outcome::Failed(reason) = &outcome {
                    tracing::warn!(capability = %name, reason = %reason, "capability failed");
                }
                outcome.into_sentence()
            }
            Err(e) => {
                tracing::warn!(capability = %name, error = %e, "unknown capability invoked");
                UNKNOWN_CAPABILITY_REPLY.to_owned()
            }
        }
    }

    /// Return a snapshot of all registered capabilities, sorted by name.
    pub fn list(&self) -> Vec<CapabilityInfo> {
        let mut infos: Vec<CapabilityInfo> = self
            .inner
            .iter()
            .map(|entry| CapabilityInfo {
                name: entry.value().name().to_owned(),
                description: entry.value().description().to_owned(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Number of registered capabilities.
    pub fn count(&self) -> usize {
        self.inner.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
