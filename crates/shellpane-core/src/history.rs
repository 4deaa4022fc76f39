//! Submitted-command history with Up/Down browsing.
//!
//! The browsing cursor is `None` while idle. While browsing it always points
//! at a valid entry:
//!
//! ```text
//! Idle        --Up-->   Browsing(last)
//! Browsing(i) --Up-->   Browsing(max(i - 1, 0))
//! Browsing(i) --Down--> Browsing(i + 1)       when i < last
//! Browsing(last) --Down--> Idle
//! ```

use std::collections::VecDeque;

/// Default number of commands kept before the oldest is evicted
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Result of a browsing step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryStep {
    /// The pending line should become this entry
    Recall(String),
    /// Browsing ran past the newest entry; the pending line should be cleared
    Exhausted,
    /// Nothing to do (empty history, or Down while idle)
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    /// Index of the entry being shown, `None` when not browsing
    cursor: Option<usize>,
    /// Maximum number of entries, `None` for unbounded
    limit: Option<usize>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_limit(Some(DEFAULT_HISTORY_LIMIT))
    }
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `limit` entries (`None` = no cap).
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            limit,
        }
    }

    /// Record a submitted command.
    ///
    /// Trailing whitespace is stripped; blank commands are not recorded.
    /// Returns whether the command was stored.
    pub fn push(&mut self, command: &str) -> bool {
        let command = command.trim_end();
        if command.is_empty() {
            return false;
        }

        if let Some(limit) = self.limit {
            if limit == 0 {
                return false;
            }
            while self.entries.len() >= limit {
                self.entries.pop_front();
            }
        }
        self.entries.push_back(command.to_string());
        self.cursor = None;
        true
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Current browsing position, `None` when idle
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_browsing(&self) -> bool {
        self.cursor.is_some()
    }

    /// Leave browsing mode without touching the entries.
    pub fn stop_browsing(&mut self) {
        self.cursor = None;
    }

    /// Step towards older entries (Up).
    pub fn older(&mut self) -> HistoryStep {
        if self.entries.is_empty() {
            return HistoryStep::Unchanged;
        }
        let index = match self.cursor {
            None => self.entries.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.cursor = Some(index);
        HistoryStep::Recall(self.entries[index].clone())
    }

    /// Step towards newer entries (Down).
    pub fn newer(&mut self) -> HistoryStep {
        let Some(current) = self.cursor else {
            return HistoryStep::Unchanged;
        };
        let next = current + 1;
        if next >= self.entries.len() {
            self.cursor = None;
            HistoryStep::Exhausted
        } else {
            self.cursor = Some(next);
            HistoryStep::Recall(self.entries[next].clone())
        }
    }
}
