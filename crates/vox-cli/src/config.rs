//! CLI configuration.
//!
//! Settings come from an optional `vox.toml` in the working directory with
//! environment variables layered on top (`VOX_BIND_ADDR`, `VOX_PORT`).
//! Model and provider selection live in the environment (`VOX_PROVIDER`,
//! `VOX_MODEL`, API keys) and are resolved by the agent crate; the file can
//! name a model as a fallback when `VOX_MODEL` is unset.

use std::path::Path;

use serde::Deserialize;

use vox_web::WebConfig;

/// Settings read from `vox.toml`, all optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Port the HTTP server listens on.
    pub port: Option<u16>,
    /// Fallback model, used when `VOX_MODEL` is unset.
    pub model: Option<String>,
    /// Override for the assistant's system prompt.
    pub system_prompt: Option<String>,
}

impl CliConfig {
    /// Load `vox.toml` from the working directory, then apply environment
    /// overrides.
    pub fn load() -> Self {
        let mut config = Self::load_from(Path::new("vox.toml"));
        config.apply_env();
        config
    }

    /// Read a config file, falling back to defaults when it is missing or
    /// malformed (a broken file is logged, not fatal).
    pub fn load_from(path: &Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Self::default();
        };

        match toml::from_str(&raw) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                Self::default()
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("VOX_BIND_ADDR") {
            if !addr.is_empty() {
                self.bind_addr = Some(addr);
            }
        }
        if let Ok(port) = std::env::var("VOX_PORT") {
            match port.parse() {
                Ok(port) => self.port = Some(port),
                Err(_) => tracing::warn!(value = %port, "ignoring invalid VOX_PORT"),
            }
        }
    }

    /// The web server configuration this resolves to.
    pub fn web_config(&self) -> WebConfig {
        let defaults = WebConfig::default();
        WebConfig {
            bind_addr: self.bind_addr.clone().unwrap_or(defaults.bind_addr),
            port: self.port.unwrap_or(defaults.port),
        }
    }
}
