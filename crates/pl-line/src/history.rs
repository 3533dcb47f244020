//! Command history — bounded FIFO of previously entered lines.
//!
//! Entries live in insertion order, oldest first. When the cap is
//! exceeded the oldest entry is evicted. Shrinking the cap takes effect
//! on the next [`push`](History::push), not immediately.
//!
//! During an active `readline` the editor pushes an empty *sentinel*
//! entry at the tail so that up/down navigation has a symmetric slot for
//! the line being typed; the editor removes it again on every exit path.
//! Navigation itself goes through the tail-relative hooks
//! [`entry_back`](History::entry_back) /
//! [`replace_back`](History::replace_back): the live buffer is written
//! into the current slot before the history cursor moves, so walking
//! away from an edited entry and back preserves the edit.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;

/// Default maximum number of retained entries.
const DEFAULT_MAX_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Bounded FIFO of input lines.
#[derive(Debug)]
pub struct History {
    entries: VecDeque<String>,
    max_size: usize,
}

impl History {
    /// Create an empty history with the default cap of 100 entries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// Number of entries, including any active sentinel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry, evicting from the front while over the cap.
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push_back(line.into());
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
    }

    /// Remove and return the newest entry.
    pub fn pop_last(&mut self) -> Option<String> {
        self.entries.pop_back()
    }

    /// Change the cap. Existing excess entries are only trimmed by
    /// subsequent [`push`](Self::push) calls.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
    }

    /// The entry `back` positions from the tail (0 = newest).
    #[must_use]
    pub fn entry_back(&self, back: usize) -> Option<&str> {
        let idx = self.entries.len().checked_sub(back + 1)?;
        self.entries.get(idx).map(String::as_str)
    }

    /// Overwrite the entry `back` positions from the tail (0 = newest).
    pub fn replace_back(&mut self, back: usize, line: &str) {
        if let Some(idx) = self.entries.len().checked_sub(back + 1) {
            if let Some(slot) = self.entries.get_mut(idx) {
                line.clone_into(slot);
            }
        }
    }

    /// Iterate entries oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Append entries from a file, one per line. LF and CRLF delimiters
    /// are both accepted; a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(());
        }
        let contents = fs::read_to_string(path)?;
        if contents.is_empty() {
            return Ok(());
        }
        for line in contents.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            self.entries.push_back(line.to_string());
        }
        // A trailing newline produces one empty final fragment; drop it.
        if contents.ends_with('\n') {
            self.entries.pop_back();
        }
        Ok(())
    }

    /// Overwrite a file with one entry per line.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(entry);
            out.push('\n');
        }
        fs::write(path, out)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
