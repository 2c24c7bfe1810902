#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bounded linear undo/redo over submission text.

use std::collections::VecDeque;

/// Number of entries kept when no explicit depth is configured.
pub const DEFAULT_DEPTH: usize = 100;

/// Linear history of submission snapshots with a redo future.
///
/// The last entry of the past is always the current submission. Recording a
/// new snapshot clears the future; undo and redo move snapshots between the
/// two lists without copying them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    past: VecDeque<String>,
    future: Vec<String>,
    depth: usize,
}

impl History {
    /// Creates a history seeded with the initial submission.
    ///
    /// A depth of zero is treated as one so the current entry is never lost.
    #[must_use]
    pub fn new(initial: String, depth: usize) -> Self {
        let mut past = VecDeque::new();
        past.push_back(initial);
        Self {
            past,
            future: Vec::new(),
            depth: depth.max(1),
        }
    }

    /// Maximum number of entries retained, including the current one.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The submission the board currently shows.
    #[must_use]
    pub fn current(&self) -> &str {
        self.past.back().map_or("", String::as_str)
    }

    /// Number of entries reachable with undo.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.past.len().saturating_sub(1)
    }

    /// Number of entries reachable with redo.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    /// Records a new snapshot after an edit.
    ///
    /// Returns `false` when the text matches the current entry, in which case
    /// nothing changes and the future is kept.
    pub fn record(&mut self, text: String) -> bool {
        if self.current() == text {
            return false;
        }
        self.future.clear();
        self.past.push_back(text);
        while self.past.len() > self.depth {
            let _ = self.past.pop_front();
        }
        true
    }

    /// Steps back one entry, returning the submission to restore.
    ///
    /// With only the initial entry left this is a no-op returning `None`.
    pub fn undo(&mut self) -> Option<&str> {
        if self.past.len() < 2 {
            return None;
        }
        let undone = self.past.pop_back()?;
        self.future.push(undone);
        Some(self.current())
    }

    /// Re-applies the most recently undone entry.
    pub fn redo(&mut self) -> Option<&str> {
        let redone = self.future.pop()?;
        self.past.push_back(redone);
        Some(self.current())
    }

    /// Discards every entry and restarts from `initial`, as on level switch.
    pub fn reset(&mut self, initial: String) {
        self.past.clear();
        self.future.clear();
        self.past.push_back(initial);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_with_only_initial_entry_is_noop() {
        let mut history = History::new("a".to_string(), 10);
        assert_eq!(history.undo(), None);
        assert_eq!(history.current(), "a");
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn identical_text_is_not_recorded() {
        let mut history = History::new("a".to_string(), 10);
        assert!(!history.record("a".to_string()));
        assert_eq!(history.undo_len(), 0);
    }

    #[test]
    fn redo_after_undo_restores_exact_text() {
        let edited = "x__\n\n___\r\n".to_string();
        let mut history = History::new("___".to_string(), 10);
        assert!(history.record(edited.clone()));

        assert_eq!(history.undo(), Some("___"));
        assert_eq!(history.redo().map(str::to_owned), Some(edited));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn new_edit_clears_future() {
        let mut history = History::new("a".to_string(), 10);
        let _ = history.record("b".to_string());
        let _ = history.undo();
        assert_eq!(history.redo_len(), 1);

        let _ = history.record("c".to_string());
        assert_eq!(history.redo_len(), 0);
        assert_eq!(history.undo(), Some("a"));
    }

    #[test]
    fn depth_bound_drops_oldest_entries() {
        let mut history = History::new("0".to_string(), 3);
        for step in 1..=5 {
            let _ = history.record(step.to_string());
        }
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.undo(), Some("4"));
        assert_eq!(history.undo(), Some("3"));
        assert_eq!(history.undo(), None, "entries beyond the cap are gone");
    }

    #[test]
    fn reset_discards_both_directions() {
        let mut history = History::new("a".to_string(), DEFAULT_DEPTH);
        let _ = history.record("b".to_string());
        let _ = history.undo();
        history.reset("level two".to_string());
        assert_eq!(history.current(), "level two");
        assert_eq!((history.undo_len(), history.redo_len()), (0, 0));
    }
}
