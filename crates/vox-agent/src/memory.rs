//! Bounded conversation memory.
//!
//! [`ConversationMemory`] holds the short-term history that feeds the
//! fallback responder: one pinned system turn at index 0 plus a bounded
//! tail of user/assistant turns.  Truncation runs eagerly after every
//! growing append, so no reader ever observes more than the limit.  The
//! buffer is not persisted; it lives and dies with the process.
//!
//! The buffer itself is not synchronized — the hosting layer wraps it in a
//! mutex and serializes all mutation (one writer at a time).
//!
//! # Example
//!
//! ```rust
//! # use vox_agent::memory::ConversationMemory;
//! # use vox_agent::llm::Message;
//! let mut memory = ConversationMemory::new("You are Vox.");
//! memory.append(Message::user("hello"));
//! memory.append(Message::assistant("Hi! How can I help?"));
//! assert_eq!(memory.len(), 3);
//! memory.reset();
//! assert_eq!(memory.len(), 1);
//! ```

use crate::llm::types::{Message, Role};

/// Maximum number of turns the buffer may hold, system turn included.
pub const MAX_HISTORY: usize = 20;

/// An ordered turn buffer with a pinned system turn and a bounded tail.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    system_prompt: String,
    turns: Vec<Message>,
    limit: usize,
}

impl ConversationMemory {
    /// Create a buffer holding only the system turn, with the default
    /// [`MAX_HISTORY`] limit.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self::with_limit(system_prompt, MAX_HISTORY)
    }

    /// Create a buffer with a custom limit (minimum 1: the system turn
    /// itself is never evicted).
    pub fn with_limit(system_prompt: impl Into<String>, limit: usize) -> Self {
        let system_prompt = system_prompt.into();
        let turns = vec![Message::system(&system_prompt)];
        Self {
            system_prompt,
            turns,
            limit: limit.max(1),
        }
    }

    /// Append one turn, then enforce the truncation invariant.
    ///
    /// When the buffer would exceed its limit, the system turn is kept and
    /// the oldest user/assistant turns are discarded so that the most
    /// recent `limit - 1` remain.
    pub fn append(&mut self, turn: Message) {
        self.turns.push(turn);

        if self.turns.len() > self.limit {
            let keep_tail = self.limit - 1;
            let cut = self.turns.len() - keep_tail;
            self.turns.drain(1..cut);
            tracing::debug!(
                limit = self.limit,
                len = self.turns.len(),
                "conversation memory truncated"
            );
        }
    }

    /// A consistent copy of the buffer, in insertion order.
    pub fn snapshot(&self) -> Vec<Message> {
        self.turns.clone()
    }

    /// Replace the buffer with its initial single-system-turn state.
    pub fn reset(&mut self) {
        self.turns = vec![Message::system(&self.system_prompt)];
        tracing::debug!("conversation memory reset");
    }

    /// Number of turns currently held, system turn included.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false: the system turn is always present.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The pinned system turn.
    pub fn system_turn(&self) -> &Message {
        &self.turns[0]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(memory: &mut ConversationMemory, count: usize) {
        for i in 0..count {
            if i % 2 == 0 {
                memory.append(Message::user(format!("user {i}")));
            } else {
                memory.append(Message::assistant(format!("assistant {i}")));
            }
        }
    }

    #[test]
    fn starts_with_single_system_turn() {
        let memory = ConversationMemory::new("prompt");
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.system_turn().role, Role::System);
        assert_eq!(memory.system_turn().content, "prompt");
    }

    #[test]
    fn round_trip_three_turns_in_order() {
        let mut memory = ConversationMemory::new("prompt");
        memory.reset();
        memory.append(Message::user("q"));
        memory.append(Message::assistant("a"));

        let snapshot = memory.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].role, Role::System);
        assert_eq!(snapshot[1], Message::user("q"));
        assert_eq!(snapshot[2], Message::assistant("a"));
    }

    #[test]
    fn never_exceeds_limit() {
        let mut memory = ConversationMemory::with_limit("prompt", 6);
        for i in 0..50 {
            memory.append(Message::user(format!("turn {i}")));
            assert!(memory.len() <= 6, "observed len {} after append", memory.len());
        }
    }

    #[test]
    fn truncation_keeps_system_and_most_recent() {
        let mut memory = ConversationMemory::with_limit("prompt", 4);
        fill(&mut memory, 10);

        let snapshot = memory.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[0].role, Role::System);
        assert_eq!(snapshot[1].content, "assistant 7");
        assert_eq!(snapshot[2].content, "user 8");
        assert_eq!(snapshot[3].content, "assistant 9");
    }

    #[test]
    fn default_limit_is_max_history() {
        let mut memory = ConversationMemory::new("prompt");
        fill(&mut memory, 100);
        assert_eq!(memory.len(), MAX_HISTORY);
        assert_eq!(memory.system_turn().content, "prompt");
        // The most recent turn survives.
        let last = memory.snapshot().pop().expect("non-empty");
        assert_eq!(last.content, "assistant 99");
    }

    #[test]
    fn reset_is_idempotent() {
        let mut memory = ConversationMemory::new("prompt");
        fill(&mut memory, 7);

        memory.reset();
        let first = memory.snapshot();
        memory.reset();
        let second = memory.snapshot();

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0], Message::system("prompt"));
    }

    #[test]
    fn limit_of_one_keeps_only_system() {
        let mut memory = ConversationMemory::with_limit("prompt", 1);
        memory.append(Message::user("dropped"));
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.system_turn().role, Role::System);
    }
}
