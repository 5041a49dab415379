//! The ordered rule set.
//!
//! Each [`Rule`] pairs a keyword trigger with an argument extractor and the
//! capability it dispatches to.  The rule list is data, not control flow:
//! [`default_rules`] returns the rules in their fixed priority order and the
//! router walks that list with short-circuit semantics.  Reordering the list
//! changes behavior for utterances that satisfy several triggers, so the
//! order below is part of the routing contract.
//!
//! A matcher returns `None` both when its trigger is absent and when the
//! trigger holds but extraction cannot proceed (e.g. "open" with nothing
//! after it) — in either case evaluation continues with the next rule.

use std::sync::OnceLock;

use aho_corasick::AhoCorasick;
use regex::Regex;

use crate::capability::{CapabilityArgs, names};
use crate::utterance::NormalizedUtterance;

// ---------------------------------------------------------------------------
// Rule actions
// ---------------------------------------------------------------------------

/// What a fired rule wants done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Invoke a named capability with the extracted arguments.
    Invoke {
        capability: &'static str,
        args: CapabilityArgs,
    },
    /// Answer with a fixed sentence without invoking any capability.
    Reply(String),
}

impl RuleAction {
    fn invoke(capability: &'static str, args: CapabilityArgs) -> Option<Self> {
        Some(Self::Invoke { capability, args })
    }
}

/// A single trigger/extractor entry, evaluated in list order.
pub struct Rule {
    /// Stable rule name, used for logging.
    pub name: &'static str,
    matcher: fn(&NormalizedUtterance) -> Option<RuleAction>,
}

impl Rule {
    /// Run the trigger and extractor against one utterance.
    pub fn evaluate(&self, utterance: &NormalizedUtterance) -> Option<RuleAction> {
        (self.matcher)(utterance)
    }
}

/// Approximate level used when the user asks to raise the volume without
/// naming a number.
pub const VOLUME_RAISE_APPROX: u32 = 50;

/// Fixed reply for "volume down" requests.  Lowering the volume by a
/// relative step has no real action behind it; the reply states the
/// limitation instead of pretending.
pub const VOLUME_DOWN_REPLY: &str =
    "I can't lower the volume by a step yet. Try 'set volume to 30' instead.";

/// The rule set in its fixed priority order.
#[must_use]
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "open-app",
            matcher: match_open_app,
        },
        Rule {
            name: "close-app",
            matcher: match_close_app,
        },
        Rule {
            name: "web-search",
            matcher: match_web_search,
        },
        Rule {
            name: "volume",
            matcher: match_volume,
        },
        Rule {
            name: "brightness",
            matcher: match_brightness,
        },
        Rule {
            name: "lock",
            matcher: match_lock,
        },
        Rule {
            name: "screenshot",
            matcher: match_screenshot,
        },
        Rule {
            name: "minimize",
            matcher: match_minimize,
        },
        Rule {
            name: "type-text",
            matcher: match_type_text,
        },
        Rule {
            name: "shutdown",
            matcher: match_shutdown,
        },
    ]
}

// ---------------------------------------------------------------------------
// Matchers
// ---------------------------------------------------------------------------

/// "open X" / "open the X" — the target is the token after "open", skipping
/// a single "the".  No validation against known app names: any token passes
/// through to the capability.
fn match_open_app(u: &NormalizedUtterance) -> Option<RuleAction> {
    let open = u.token_position("open")?;
    let mut target = u.token_after(open)?;
    if target == "the" {
        target = u.token_at(open + 2)?;
    }
    RuleAction::invoke(names::APP_OPEN, CapabilityArgs::text(target))
}

/// "close X" — the target is the token after "close", no "the"-skipping.
fn match_close_app(u: &NormalizedUtterance) -> Option<RuleAction> {
    let close = u.token_position("close")?;
    let target = u.token_after(close)?;
    RuleAction::invoke(names::APP_CLOSE, CapabilityArgs::text(target))
}

/// "search for ..." / "... google ..." — the query is the utterance with
/// every occurrence of both trigger phrases removed, trimmed.  Fires only
/// if a non-empty query remains.
fn match_web_search(u: &NormalizedUtterance) -> Option<RuleAction> {
    if !u.contains_phrase("search for") && !u.has_token("google") {
        return None;
    }
    let query = strip_search_phrases(u.text());
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    RuleAction::invoke(names::WEB_SEARCH, CapabilityArgs::text(query))
}

fn strip_search_phrases(text: &str) -> String {
    static PHRASES: OnceLock<AhoCorasick> = OnceLock::new();
    let phrases = PHRASES.get_or_init(|| {
        AhoCorasick::new(["search for", "google"]).expect("literal patterns compile")
    });
    phrases.replace_all(text, &["", ""])
}

/// "volume" sub-dispatch, checked in order: mute/unmute, exact set with a
/// digit run, up/increase (fixed approximation), down/decrease (fixed reply,
/// no capability).  Anything else falls through.
fn match_volume(u: &NormalizedUtterance) -> Option<RuleAction> {
    if !u.has_token("volume") {
        return None;
    }
    if u.has_token("mute") || u.has_token("unmute") {
        return RuleAction::invoke(names::VOLUME_MUTE, CapabilityArgs::none());
    }
    if u.has_token("set") {
        if let Some(level) = u.first_digit_run() {
            return RuleAction::invoke(names::VOLUME_SET, CapabilityArgs::level(level));
        }
    }
    if u.has_token("up") || u.has_token("increase") {
        return RuleAction::invoke(names::VOLUME_SET, CapabilityArgs::level(VOLUME_RAISE_APPROX));
    }
    if u.has_token("down") || u.has_token("decrease") {
        return Some(RuleAction::Reply(VOLUME_DOWN_REPLY.to_owned()));
    }
    None
}

/// "set brightness to N" — requires both "brightness" and "set" plus a
/// digit run.  The level is passed through unclamped; the capability clamps
/// to [0, 100].
fn match_brightness(u: &NormalizedUtterance) -> Option<RuleAction> {
    if !u.has_token("brightness") || !u.has_token("set") {
        return None;
    }
    let level = u.first_digit_run()?;
    RuleAction::invoke(names::BRIGHTNESS_SET, CapabilityArgs::level(level))
}

/// "lock the pc" / "lock my computer".
fn match_lock(u: &NormalizedUtterance) -> Option<RuleAction> {
    if u.has_token("lock") && (u.has_token("pc") || u.has_token("computer")) {
        return RuleAction::invoke(names::LOCK, CapabilityArgs::none());
    }
    None
}

fn match_screenshot(u: &NormalizedUtterance) -> Option<RuleAction> {
    if u.has_token("screenshot") {
        return RuleAction::invoke(names::SCREENSHOT, CapabilityArgs::none());
    }
    None
}

fn match_minimize(u: &NormalizedUtterance) -> Option<RuleAction> {
    if u.has_token("minimize") {
        return RuleAction::invoke(names::MINIMIZE, CapabilityArgs::none());
    }
    None
}

/// "type ..." — the text is the utterance with the first occurrence of the
/// word "type" removed, trimmed.  Fires only on a non-empty remainder.
fn match_type_text(u: &NormalizedUtterance) -> Option<RuleAction> {
    if !u.has_token("type") {
        return None;
    }
    static TYPE_WORD: OnceLock<Regex> = OnceLock::new();
    let type_word =
        TYPE_WORD.get_or_init(|| Regex::new(r"\btype\b").expect("literal pattern compiles"));
    let remainder = type_word.replacen(u.text(), 1, "");
    let remainder = remainder.trim();
    if remainder.is_empty() {
        return None;
    }
    RuleAction::invoke(names::TYPE_TEXT, CapabilityArgs::text(remainder))
}

fn match_shutdown(u: &NormalizedUtterance) -> Option<RuleAction> {
    if u.has_token("shutdown") {
        return RuleAction::invoke(names::SHUTDOWN, CapabilityArgs::none());
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn first_action(input: &str) -> Option<RuleAction> {
        let u = NormalizedUtterance::new(input);
        default_rules().iter().find_map(|rule| rule.evaluate(&u))
    }

    fn expect_invoke(input: &str) -> (&'static str, CapabilityArgs) {
        match first_action(input) {
            Some(RuleAction::Invoke { capability, args }) => (capability, args),
            other => panic!("expected Invoke for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn open_extracts_following_token() {
        let (capability, args) = expect_invoke("open notepad");
        assert_eq!(capability, names::APP_OPEN);
        assert_eq!(args, CapabilityArgs::text("notepad"));
    }

    #[test]
    fn open_skips_the() {
        let (_, args) = expect_invoke("open the calculator");
        assert_eq!(args, CapabilityArgs::text("calculator"));
    }

    #[test]
    fn open_is_case_insensitive() {
        let (_, args) = expect_invoke("Open NOTEPAD");
        assert_eq!(args, CapabilityArgs::text("notepad"));
    }

    #[test]
    fn open_with_nothing_after_falls_through() {
        // "open" is the last token, so extraction fails and evaluation
        // continues — here down to the screenshot rule.
        let (capability, _) = expect_invoke("screenshot then open");
        assert_eq!(capability, names::SCREENSHOT);
    }

    #[test]
    fn open_the_with_nothing_after_falls_through() {
        assert_eq!(first_action("open the"), None);
    }

    #[test]
    fn open_passes_nonsense_through() {
        let (_, args) = expect_invoke("open qwertyuiop");
        assert_eq!(args, CapabilityArgs::text("qwertyuiop"));
    }

    #[test]
    fn close_extracts_following_token() {
        let (capability, args) = expect_invoke("close spotify");
        assert_eq!(capability, names::APP_CLOSE);
        assert_eq!(args, CapabilityArgs::text("spotify"));
    }

    #[test]
    fn close_does_not_skip_the() {
        let (_, args) = expect_invoke("close the spotify");
        assert_eq!(args, CapabilityArgs::text("the"));
    }

    #[test]
    fn search_for_extracts_query() {
        let (capability, args) = expect_invoke("search for rust lifetimes");
        assert_eq!(capability, names::WEB_SEARCH);
        assert_eq!(args, CapabilityArgs::text("rust lifetimes"));
    }

    #[test]
    fn google_token_extracts_query() {
        let (_, args) = expect_invoke("google rust lifetimes");
        assert_eq!(args, CapabilityArgs::text("rust lifetimes"));
    }

    #[test]
    fn search_removes_both_phrases() {
        // Both trigger phrases present: the rule fires once and the query
        // has every occurrence of both removed.
        let (capability, args) = expect_invoke("google search for rust lifetimes");
        assert_eq!(capability, names::WEB_SEARCH);
        assert_eq!(args, CapabilityArgs::text("rust lifetimes"));
    }

    #[test]
    fn search_with_empty_remainder_falls_through() {
        assert_eq!(first_action("google"), None);
        assert_eq!(first_action("search for"), None);
    }

    #[test]
    fn volume_set_extracts_level() {
        let (capability, args) = expect_invoke("set volume to 73");
        assert_eq!(capability, names::VOLUME_SET);
        assert_eq!(args, CapabilityArgs::level(73));
    }

    #[test]
    fn volume_mute() {
        let (capability, args) = expect_invoke("mute the volume");
        assert_eq!(capability, names::VOLUME_MUTE);
        assert_eq!(args, CapabilityArgs::none());
    }

    #[test]
    fn volume_unmute() {
        let (capability, _) = expect_invoke("unmute volume");
        assert_eq!(capability, names::VOLUME_MUTE);
    }

    #[test]
    fn volume_increase_uses_approximation() {
        let (capability, args) = expect_invoke("increase volume");
        assert_eq!(capability, names::VOLUME_SET);
        assert_eq!(args, CapabilityArgs::level(VOLUME_RAISE_APPROX));
    }

    #[test]
    fn volume_up_uses_approximation() {
        let (_, args) = expect_invoke("turn volume up");
        assert_eq!(args, CapabilityArgs::level(VOLUME_RAISE_APPROX));
    }

    #[test]
    fn volume_down_replies_without_capability() {
        match first_action("turn volume down") {
            Some(RuleAction::Reply(text)) => assert_eq!(text, VOLUME_DOWN_REPLY),
            other => panic!("expected Reply, got {other:?}"),
        }
    }

    #[test]
    fn volume_set_without_digits_checks_direction_words() {
        // "set" with no digit run does not fire set-volume; "up" still does.
        let (_, args) = expect_invoke("set the volume up");
        assert_eq!(args, CapabilityArgs::level(VOLUME_RAISE_APPROX));
    }

    #[test]
    fn volume_alone_falls_through() {
        assert_eq!(first_action("volume"), None);
    }

    #[test]
    fn mute_without_volume_token_falls_through() {
        assert_eq!(first_action("mute everything"), None);
    }

    #[test]
    fn brightness_set_extracts_level_unclamped() {
        let (capability, args) = expect_invoke("set brightness to 150");
        assert_eq!(capability, names::BRIGHTNESS_SET);
        // Clamping to [0, 100] is the capability's job.
        assert_eq!(args, CapabilityArgs::level(150));
    }

    #[test]
    fn brightness_without_set_falls_through() {
        assert_eq!(first_action("brightness"), None);
        assert_eq!(first_action("brightness 40"), None);
    }

    #[test]
    fn brightness_set_without_digits_falls_through() {
        assert_eq!(first_action("set the brightness higher"), None);
    }

    #[test]
    fn lock_requires_pc_or_computer() {
        let (capability, _) = expect_invoke("lock the pc");
        assert_eq!(capability, names::LOCK);
        let (capability, _) = expect_invoke("lock my computer");
        assert_eq!(capability, names::LOCK);
        assert_eq!(first_action("lock the door"), None);
    }

    #[test]
    fn screenshot_minimize_shutdown() {
        assert_eq!(expect_invoke("take a screenshot").0, names::SCREENSHOT);
        assert_eq!(expect_invoke("minimize everything").0, names::MINIMIZE);
        assert_eq!(expect_invoke("shutdown now").0, names::SHUTDOWN);
    }

    #[test]
    fn type_text_removes_first_word_only() {
        let (capability, args) = expect_invoke("type hello world");
        assert_eq!(capability, names::TYPE_TEXT);
        assert_eq!(args, CapabilityArgs::text("hello world"));
    }

    #[test]
    fn type_text_keeps_later_occurrences() {
        let (_, args) = expect_invoke("type type faster");
        assert_eq!(args, CapabilityArgs::text("type faster"));
    }

    #[test]
    fn type_word_boundary_is_respected() {
        // "typewriter" must not be mangled; the standalone word is removed.
        let (_, args) = expect_invoke("type typewriter");
        assert_eq!(args, CapabilityArgs::text("typewriter"));
    }

    #[test]
    fn type_alone_falls_through() {
        assert_eq!(first_action("type"), None);
    }

    #[test]
    fn priority_open_beats_volume() {
        // Satisfies both the open-app and volume triggers; the earlier rule
        // in priority order wins.
        let (capability, args) = expect_invoke("open volume mixer");
        assert_eq!(capability, names::APP_OPEN);
        assert_eq!(args, CapabilityArgs::text("volume"));
    }

    #[test]
    fn priority_close_beats_search() {
        let (capability, _) = expect_invoke("close google chrome");
        assert_eq!(capability, names::APP_CLOSE);
    }

    #[test]
    fn no_rule_matches_plain_question() {
        assert_eq!(first_action("what is the capital of France"), None);
    }

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<&str> = default_rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "open-app",
                "close-app",
                "web-search",
                "volume",
                "brightness",
                "lock",
                "screenshot",
                "minimize",
                "type-text",
                "shutdown",
            ]
        );
    }
}
