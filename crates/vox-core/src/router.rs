//! Intent router.
//!
//! The router evaluates the ordered rule list against a normalized
//! utterance.  The first rule whose trigger holds *and* whose extraction
//! succeeds short-circuits: its capability is invoked (or its fixed reply
//! returned) and the result becomes the outcome.  A rule whose trigger
//! holds but whose extraction fails is skipped, not fatal — evaluation
//! continues with the next rule.  When no rule fires the outcome is
//! [`RouteOutcome::Unhandled`] and the caller takes the conversational
//! fallback path; the router itself never touches conversation memory.

use serde::{Deserialize, Serialize};

use crate::capability::CapabilityRegistry;
use crate::rules::{Rule, RuleAction, default_rules};
use crate::utterance::NormalizedUtterance;

/// The outcome of routing one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteOutcome {
    /// A rule fired; the reply sentence is ready to return.
    Handled(String),
    /// No rule fired.  The caller should take the fallback path.
    Unhandled,
}

/// Ordered-rule intent router over a capability registry.
pub struct IntentRouter {
    rules: Vec<Rule>,
    capabilities: CapabilityRegistry,
}

impl IntentRouter {
    /// Create a router with the default rule set over `capabilities`.
    #[must_use]
    pub fn new(capabilities: CapabilityRegistry) -> Self {
        Self {
            rules: default_rules(),
            capabilities,
        }
    }

    /// Number of rules in the set.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Route one raw utterance.
    ///
    /// Normalizes, walks the rule list in priority order, and dispatches
    /// the first action found.  Capability failures never surface here —
    /// they arrive already flattened into reply sentences.
    pub async fn route(&self, utterance: &str) -> RouteOutcome {
        let normalized = NormalizedUtterance::new(utterance);

        for rule in &self.rules {
            match rule.evaluate(&normalized) {
                Some(RuleAction::Invoke { capability, args }) => {
                    tracing::debug!(rule = rule.name, capability, "rule fired");
                    let reply = self.capabilities.invoke(capability, args).await;
                    return RouteOutcome::Handled(reply);
                }
                Some(RuleAction::Reply(text)) => {
                    tracing::debug!(rule = rule.name, "rule fired with fixed reply");
                    return RouteOutcome::Handled(text);
                }
                None => {}
            }
        }

        tracing::debug!(utterance = %utterance, "no rule matched, deferring to fallback");
        RouteOutcome::Unhandled
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
