//! Command history and input navigation.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::evaluator::{Evaluation, Evaluator};
use crate::pending::PendingResult;

/// One submitted command and its result.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    /// The command as submitted, trimmed.
    pub command: String,
    /// The result, settled in place once evaluation finishes.
    pub result: PendingResult,
}

impl HistoryEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(command: impl Into<String>, result: PendingResult) -> Self {
        Self {
            command: command.into(),
            result,
        }
    }
}

/// Direction of history navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards the oldest entry (arrow up).
    Older,
    /// Towards the blank input line (arrow down).
    Newer,
}

/// Owns the history entries and the navigation cursor.
///
/// The cursor ranges over `0..=len`; `len` is the blank new line. Entries
/// are only ever appended, or all removed by `:clear`.
pub struct HistoryController {
    evaluator: Evaluator,
    entries: Vec<HistoryEntry>,
    cursor: usize,
    generation: Rc<Cell<u64>>,
}

impl HistoryController {
    /// Creates an empty history over `evaluator`.
    #[must_use]
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            entries: Vec::new(),
            cursor: 0,
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Submits a line.
    ///
    /// `:clear` empties the history. Any other non-empty line is evaluated
    /// and appended immediately, even if its result is still pending. The
    /// cursor returns to the blank line afterwards.
    pub fn submit(&mut self, line: &str) -> Evaluation {
        let evaluation = self.evaluator.evaluate(line);
        match &evaluation {
            Evaluation::Skipped => {}
            Evaluation::Cleared => self.clear(),
            Evaluation::Pending(result) => {
                self.entries
                    .push(HistoryEntry::new(line.trim(), result.clone()));
            }
        }
        self.cursor = self.entries.len();
        evaluation
    }

    /// Moves the cursor and returns the command under it, or an empty
    /// string on the blank line.
    pub fn navigate(&mut self, direction: Direction) -> String {
        self.cursor = match direction {
            Direction::Older => self.cursor.saturating_sub(1),
            Direction::Newer => (self.cursor + 1).min(self.entries.len()),
        };
        self.entries
            .get(self.cursor)
            .map(|entry| entry.command.clone())
            .unwrap_or_default()
    }

    /// Removes every entry.
    ///
    /// Results still in flight keep running. Their entries are gone, so
    /// settling changes nothing visible.
    pub fn clear(&mut self) {
        debug!(entries = self.entries.len(), "clearing history");
        self.entries.clear();
        self.cursor = 0;
        self.generation.set(self.generation.get() + 1);
    }

    /// Replaces the history with previously saved entries.
    pub fn restore(&mut self, entries: Vec<HistoryEntry>) {
        self.clear();
        self.entries = entries;
        self.cursor = self.entries.len();
    }

    /// Returns the entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Returns the navigation cursor.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the current generation. It changes whenever the history is
    /// emptied.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Returns a shared handle to the generation counter, for tasks that
    /// outlive the entry they were spawned for.
    #[must_use]
    pub(crate) fn generation_handle(&self) -> Rc<Cell<u64>> {
        Rc::clone(&self.generation)
    }

    /// Returns the evaluator.
    pub fn evaluator_mut(&mut self) -> &mut Evaluator {
        &mut self.evaluator
    }
}
