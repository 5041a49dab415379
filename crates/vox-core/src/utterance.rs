//! Utterance normalization.
//!
//! A [`NormalizedUtterance`] is the only view of user input the rule set
//! ever sees: the raw string lowercased, plus its whitespace-split token
//! sequence.  Lowercasing is the whole normalization step — no punctuation
//! stripping, no stemming — so "Open Chrome!" tokenizes as `["open",
//! "chrome!"]` and argument extraction stays purely positional.
//!
//! # Example
//!
//! ```rust
//! # use vox_core::utterance::NormalizedUtterance;
//! let u = NormalizedUtterance::new("Set volume to 73");
//! assert!(u.has_token("volume"));
//! assert_eq!(u.token_after(u.token_position("set").unwrap()), Some("volume"));
//! assert_eq!(u.first_digit_run(), Some(73));
//! ```

use std::sync::OnceLock;

use regex::Regex;

/// A lowercased, tokenized view of one user utterance.
///
/// Immutable once created.  Token positions are indices into the
/// whitespace-split sequence of the lowercased text.
#[derive(Debug, Clone)]
pub struct NormalizedUtterance {
    text: String,
    tokens: Vec<String>,
}

impl NormalizedUtterance {
    /// Normalize a raw utterance: lowercase, then split on whitespace.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let text = raw.to_lowercase();
        let tokens = text.split_whitespace().map(str::to_owned).collect();
        Self { text, tokens }
    }

    /// The full lowercased text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The whitespace-split tokens of the lowercased text.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether `word` appears as a whole token.
    pub fn has_token(&self, word: &str) -> bool {
        self.tokens.iter().any(|t| t == word)
    }

    /// Position of the first occurrence of `word` in the token sequence.
    pub fn token_position(&self, word: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t == word)
    }

    /// The token at `position`, if any.
    pub fn token_at(&self, position: usize) -> Option<&str> {
        self.tokens.get(position).map(String::as_str)
    }

    /// The token immediately following `position`, if any.
    pub fn token_after(&self, position: usize) -> Option<&str> {
        self.token_at(position + 1)
    }

    /// Whether the lowercased text contains `phrase` as a substring.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        self.text.contains(phrase)
    }

    /// Parse the first run of decimal digits anywhere in the text.
    ///
    /// Returns `None` when no digit run exists, or when the run does not
    /// fit in a `u32` — callers treat both as extraction failure.
    pub fn first_digit_run(&self) -> Option<u32> {
        static DIGITS: OnceLock<Regex> = OnceLock::new();
        let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("literal pattern compiles"));
        digits.find(&self.text)?.as_str().parse().ok()
    }
}
