//! Conversation History
//!
//! Bounded FIFO buffer of chat turns, shared across every channel and user
//! the relay serves. Oldest turns are evicted once capacity is reached.

use crate::llm::ChatTurn;
use std::collections::VecDeque;

/// Default number of turns kept in history.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Fixed-capacity, insertion-ordered buffer of chat turns.
///
/// Not persisted: the buffer lives for the process lifetime and starts empty
/// on every restart. Callers share it behind a mutex; the buffer itself is
/// plain single-threaded state.
#[derive(Debug)]
pub struct HistoryBuffer {
    turns: VecDeque<ChatTurn>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer holding at most `capacity` turns.
    /// A zero capacity is clamped to 1 so `append` stays total.
    pub fn new(capacity: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a turn, evicting the oldest turn first if the buffer is full.
    pub fn append(&mut self, turn: ChatTurn) {
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    /// Ordered copy of the current turns, oldest first.
    pub fn snapshot(&self) -> Vec<ChatTurn> {
        self.turns.iter().cloned().collect()
    }

    /// Drop all turns immediately.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(n: usize) -> ChatTurn {
        ChatTurn::user("tester", format!("message {n}"))
    }

    #[test]
    fn test_append_within_capacity() {
        let mut buf = HistoryBuffer::new(5);
        for n in 0..3 {
            buf.append(turn(n));
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.snapshot()[0].content, "message 0");
    }

    #[test]
    fn test_bound_holds_after_every_append() {
        let mut buf = HistoryBuffer::new(4);
        for n in 0..20 {
            buf.append(turn(n));
            assert!(buf.len() <= 4);
        }
    }

    #[test]
    fn test_eviction_keeps_last_n_in_order() {
        let mut buf = HistoryBuffer::new(3);
        for n in 0..7 {
            buf.append(turn(n));
        }
        let contents: Vec<String> = buf.snapshot().into_iter().map(|t| t.content).collect();
        assert_eq!(contents, vec!["message 4", "message 5", "message 6"]);
    }

    #[test]
    fn test_duplicate_content_is_permitted() {
        let mut buf = HistoryBuffer::new(5);
        buf.append(ChatTurn::user("a", "same".to_string()));
        buf.append(ChatTurn::user("a", "same".to_string()));
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_clear_empties_immediately() {
        let mut buf = HistoryBuffer::new(10);
        for n in 0..5 {
            buf.append(turn(n));
        }
        buf.clear();
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert!(buf.snapshot().is_empty());
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut buf = HistoryBuffer::new(0);
        buf.append(turn(0));
        assert_eq!(buf.len(), 1);
    }
}
