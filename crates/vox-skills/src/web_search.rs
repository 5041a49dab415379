//! Web search capability.
//!
//! Builds a search URL for the default engine and opens it in the system
//! browser.  The search itself happens in the browser; this capability only
//! launches it, detached, and reports what it did.

use async_trait::async_trait;
use tokio::process::Command;
use url::Url;

use vox_core::capability::{Capability, CapabilityArgs, Outcome, names};

/// Search engine endpoints, queried via a `q` parameter.
const ENGINES: &[(&str, &str)] = &[
    ("google", "https://www.google.com/search"),
    ("bing", "https://www.bing.com/search"),
    ("duckduckgo", "https://duckduckgo.com/"),
];

const DEFAULT_ENGINE: &str = "google";

/// Opens a web search for the extracted query in the default browser.
#[derive(Debug)]
pub struct WebSearch {
    engine: &'static str,
}

impl Default for WebSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSearch {
    /// A search capability using the default engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: DEFAULT_ENGINE,
        }
    }

    /// Use a specific engine; unknown names fall back to the default.
    #[must_use]
    pub fn with_engine(engine: &str) -> Self {
        let engine = ENGINES
            .iter()
            .find(|(name, _)| *name == engine)
            .map(|(name, _)| *name)
            .unwrap_or(DEFAULT_ENGINE);
        Self { engine }
    }

    /// The engine names this capability knows.
    pub fn known_engines() -> Vec<&'static str> {
        ENGINES.iter().map(|(name, _)| *name).collect()
    }
}

#[async_trait]
impl Capability for WebSearch {
    fn name(&self) -> &str {
        names::WEB_SEARCH
    }

    fn description(&self) -> &str {
        "Opens a web search in the default browser. Engines: google (default), \
         bing, duckduckgo."
    }

    async fn invoke(&self, args: CapabilityArgs) -> Outcome {
        let query = match args.text.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => query.to_owned(),
            _ => return Outcome::Done("Please specify what you want to search for.".to_owned()),
        };

        let url = match search_url(self.engine, &query) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(engine = self.engine, error = %e, "could not build search url");
                return Outcome::Failed(format!("Sorry, I couldn't perform the search for {query}."));
            }
        };

        tracing::debug!(engine = self.engine, url = %url, "opening search");

        match open_in_browser(url.as_str()) {
            Ok(()) => Outcome::Done(format!("Searching for '{query}' using {}.", self.engine)),
            Err(e) => {
                tracing::warn!(error = %e, "browser launch failed");
                Outcome::Failed(format!("Sorry, I couldn't perform the search for {query}."))
            }
        }
    }
}

/// Build the engine URL with the query percent-encoded into `q`.
fn search_url(engine: &str, query: &str) -> Result<Url, url::ParseError> {
    let base = ENGINES
        .iter()
        .find(|(name, _)| *name == engine)
        .or_else(|| ENGINES.iter().find(|(name, _)| *name == DEFAULT_ENGINE))
        .map(|(_, base)| *base)
        .unwrap_or(ENGINES[0].1);
    Url::parse_with_params(base, &[("q", query)])
}

/// Detached browser launch; the request never waits on the browser.
#[cfg(target_os = "windows")]
fn open_in_browser(url: &str) -> std::io::Result<()> {
    Command::new("cmd")
        .args(["/C", "start", "", url])
        .spawn()
        .map(|_| ())
}

#[cfg(target_os = "macos")]
fn open_in_browser(url: &str) -> std::io::Result<()> {
    Command::new("open").arg(url).spawn().map(|_| ())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn open_in_browser(url: &str) -> std::io::Result<()> {
    Command::new("xdg-open").arg(url).spawn().map(|_| ())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_query() {
        let url = search_url("google", "rust lifetimes & borrows").expect("valid url");
        assert_eq!(url.host_str(), Some("www.google.com"));
        assert_eq!(url.path(), "/search");
        let q: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(q, [("q".to_owned(), "rust lifetimes & borrows".to_owned())]);
    }

    #[test]
    fn unknown_engine_falls_back_to_default() {
        let url = search_url("altavista", "retro").expect("valid url");
        assert_eq!(url.host_str(), Some("www.google.com"));

        let capability = WebSearch::with_engine("altavista");
        assert_eq!(capability.engine, DEFAULT_ENGINE);
    }

    #[test]
    fn known_engines_listed() {
        assert_eq!(WebSearch::known_engines(), ["google", "bing", "duckduckgo"]);
    }

    #[test]
    fn bing_and_duckduckgo_resolve() {
        assert_eq!(
            search_url("bing", "x").expect("valid url").host_str(),
            Some("www.bing.com")
        );
        assert_eq!(
            search_url("duckduckgo", "x").expect("valid url").host_str(),
            Some("duckduckgo.com")
        );
    }

    #[tokio::test]
    async fn empty_query_asks_again() {
        let outcome = WebSearch::new().invoke(CapabilityArgs::none()).await;
        assert_eq!(
            outcome,
            Outcome::Done("Please specify what you want to search for.".to_owned())
        );

        let outcome = WebSearch::new().invoke(CapabilityArgs::text("  ")).await;
        assert_eq!(
            outcome,
            Outcome::Done("Please specify what you want to search for.".to_owned())
        );
    }
}
