//! Rolling display log for the UI.
//!
//! Keeps the most recent lines only; older lines fall off the front.

use std::collections::VecDeque;

use skyswarm_types::{NotableEvent, PublishReceipt};

/// Bounded buffer of display lines, oldest first.
#[derive(Debug, Clone)]
pub struct EventLog {
    capacity: usize,
    lines: VecDeque<String>,
}

impl EventLog {
    /// An empty log keeping at most `capacity` lines (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity),
        }
    }

    /// Append `[droneId] message` for a notable event.
    pub fn record_event(&mut self, event: &NotableEvent) {
        self.push(event.log_line());
    }

    /// Append a `[SYSTEM]` status line.
    pub fn record_system(&mut self, message: &str) {
        self.push(format!("[SYSTEM] {message}"));
    }

    /// Append a line confirming a published event.
    pub fn record_receipt(&mut self, receipt: &PublishReceipt) {
        self.push(format!(
            "[{}] {} published (tx {})",
            receipt.drone_id, receipt.event_type, receipt.hash
        ));
    }

    /// Append a raw line, evicting the oldest when full.
    pub fn push(&mut self, line: String) {
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Lines currently held, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// The most recent line.
    pub fn latest(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    /// Number of lines held.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maximum number of lines held.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(5)
    }
}
