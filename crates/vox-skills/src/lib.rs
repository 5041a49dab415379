//! Vox automation capabilities.
//!
//! Concrete implementations of the [`vox_core::Capability`] contract:
//!
//! - **[`app_control`]** -- Open and close applications, with a friendly-name
//!   catalog per platform and literal fallback.
//! - **[`system_control`]** -- Volume, brightness, lock, screenshot,
//!   minimize, type-text, and shutdown via platform tools.
//! - **[`web_search`]** -- Open a web search in the default browser.
//!
//! Every capability keeps the string-only contract: failures become reply
//! sentences, never errors.

use std::sync::Arc;

use vox_core::CapabilityRegistry;

pub mod app_control;
pub mod system_control;
pub mod web_search;

pub use app_control::{AppClose, AppOpen, known_apps};
pub use system_control::{SystemAction, SystemControl};
pub use web_search::WebSearch;

/// Build a registry holding the full built-in capability set.
#[must_use]
pub fn standard_registry() -> CapabilityRegistry {
    let registry = CapabilityRegistry::new();

    registry.register(Arc::new(AppOpen::new()));
    registry.register(Arc::new(AppClose::new()));
    registry.register(Arc::new(WebSearch::new()));
    for action in SystemAction::ALL {
        registry.register(Arc::new(SystemControl::new(action)));
    }

    registry
}
