//! The editor — owns every other component and turns keystrokes into
//! completed lines.
//!
//! One `readline` call: sample the terminal width, enter raw mode, print
//! the prompt, push a sentinel history entry, then loop reading one key
//! at a time, mutating the [`LineBuffer`] and repainting. Enter commits
//! the line; Ctrl-C and Ctrl-D surface as [`ReadError`] variants; Tab
//! branches into command completion (no space left of the cursor) or
//! path completion (space present). Raw mode is restored on every exit
//! path, and the sentinel is removed on every exit path.
//!
//! When stdin is not a TTY, or `TERM` names a terminal the editor cannot
//! drive, `readline` degrades to a plain buffered line read.
//!
//! The terminal dependency is the [`Console`] trait so the whole state
//! machine can be driven by scripted byte streams in tests; the real
//! implementation is [`pl_term::terminal::Terminal`].

use std::io::{self, Read, Write};
use std::path::Path;

use pl_term::ansi;
use pl_term::keys::{self, Decoded, Key};
use pl_term::terminal::Terminal;
use thiserror::Error;

use crate::fscomplete;
use crate::history::History;
use crate::line::LineBuffer;
use crate::radix::RadixTree;
use crate::render;

/// Prompt used when the host does not supply one.
const DEFAULT_PROMPT: &str = "> ";

/// Width assumed until the first `readline` samples the terminal.
const DEFAULT_COLUMNS: usize = 80;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why `readline` returned without a line.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Ctrl-C was typed.
    #[error("interrupted")]
    Interrupted,
    /// Input ended: Ctrl-D on an empty line, or EOF on the input stream.
    #[error("end of input")]
    Eof,
    /// The terminal refused raw mode.
    #[error("could not enter raw mode: {0}")]
    RawMode(#[source] io::Error),
    /// An I/O failure on the input or output stream.
    #[error(transparent)]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Console seam
// ---------------------------------------------------------------------------

/// The raw-terminal operations the editor needs.
///
/// Implemented by [`Terminal`] for real use; tests substitute a stub so
/// the state machine can run against scripted byte streams.
pub trait Console {
    /// Whether the input is a terminal at all.
    fn is_tty(&self) -> bool;
    /// Whether `TERM` names a terminal the editor can drive.
    fn is_supported_term(&self) -> bool;
    /// Enter raw mode.
    ///
    /// # Errors
    ///
    /// Fails when the termios settings cannot be read or applied.
    fn enter_raw(&mut self) -> io::Result<()>;
    /// Restore the pre-raw settings; idempotent.
    fn leave_raw(&mut self);
    /// Current terminal width in columns.
    fn columns(&mut self) -> usize;
}

impl Console for Terminal {
    fn is_tty(&self) -> bool {
        Terminal::is_tty(self)
    }

    fn is_supported_term(&self) -> bool {
        Terminal::is_supported_term(self)
    }

    fn enter_raw(&mut self) -> io::Result<()> {
        Terminal::enter_raw(self)
    }

    fn leave_raw(&mut self) {
        Terminal::leave_raw(self);
    }

    fn columns(&mut self) -> usize {
        Terminal::columns(self)
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Interactive single-line editor with history and completion.
///
/// The host constructs one `Prompt`, registers its command vocabulary,
/// and calls [`readline`](Self::readline) in a loop. Input and output
/// streams are owned for the editor's lifetime; history persistence is
/// explicit via [`load_history`](Self::load_history) /
/// [`save_history`](Self::save_history).
///
/// Single-threaded by construction: nothing here is `Sync`, and the only
/// suspension point is the blocking byte read.
pub struct Prompt<R, W, C> {
    prompt: String,
    input: R,
    out: W,
    term: C,
    tree: RadixTree,
    history: History,
    line: LineBuffer,
    saved: LineBuffer,
}

impl Prompt<io::Stdin, io::Stdout, Terminal> {
    /// Editor on stdin/stdout with the given prompt.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self::with_io(prompt, io::stdin(), io::stdout(), Terminal::new())
    }
}

impl Default for Prompt<io::Stdin, io::Stdout, Terminal> {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}

impl<R: Read, W: Write, C: Console> Prompt<R, W, C> {
    /// Editor over explicit streams and terminal control.
    pub fn with_io(prompt: impl Into<String>, input: R, out: W, term: C) -> Self {
        Self {
            prompt: prompt.into(),
            input,
            out,
            term,
            tree: RadixTree::new(),
            history: History::new(),
            line: LineBuffer::new(DEFAULT_COLUMNS),
            saved: LineBuffer::new(DEFAULT_COLUMNS),
        }
    }

    /// Add one word to the completion vocabulary.
    pub fn register_completion(&mut self, word: &str) {
        self.tree.insert(word);
    }

    /// Append a line to the history.
    pub fn add_history(&mut self, line: &str) {
        self.history.push(line);
    }

    /// Change the history cap; excess trims on subsequent additions.
    pub fn set_history_size(&mut self, size: usize) {
        self.history.set_max_size(size);
    }

    /// Number of history entries.
    #[must_use]
    pub fn history_size(&self) -> usize {
        self.history.len()
    }

    /// Append history entries from a file; a missing file is fine.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load_history(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        self.history.load(path)
    }

    /// Write the history to a file, one entry per line.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_history(&self, path: impl AsRef<Path>) -> io::Result<()> {
        self.history.save(path)
    }

    /// Read one line from the user.
    ///
    /// # Errors
    ///
    /// [`ReadError::Eof`] at end of input, [`ReadError::Interrupted`] on
    /// Ctrl-C, [`ReadError::RawMode`] when the terminal cannot enter raw
    /// mode, [`ReadError::Io`] on stream failures.
    pub fn readline(&mut self) -> Result<String, ReadError> {
        if !self.term.is_tty() || !self.term.is_supported_term() {
            return self.read_plain_line();
        }

        self.term.enter_raw().map_err(ReadError::RawMode)?;
        let result = self.edit_line();
        self.term.leave_raw();

        // Out of raw mode: drop below the edited line before returning
        // control, so host output does not overwrite it.
        let _ = self.out.write_all(b"\n");
        let _ = self.out.flush();
        result
    }

    // ── Plain fallback ──────────────────────────────────────────────

    /// Unedited line read for pipes, files, and bare terminals.
    fn read_plain_line(&mut self) -> Result<String, ReadError> {
        let mut bytes = Vec::new();
        loop {
            match keys::read_byte(&mut self.input)? {
                None => {
                    // The final line may lack a newline.
                    if bytes.is_empty() {
                        return Err(ReadError::Eof);
                    }
                    break;
                }
                Some(b'\n') => break,
                Some(b) => bytes.push(b),
            }
        }
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    // ── Raw-mode editing ────────────────────────────────────────────

    /// One raw-mode editing session: prompt, sentinel, key loop.
    fn edit_line(&mut self) -> Result<String, ReadError> {
        let columns = self.term.columns();
        self.line.set_columns(columns);
        self.line.reset();

        self.out.write_all(self.prompt.as_bytes())?;
        self.out.flush()?;

        // Sentinel slot for the line being typed; removed on every exit.
        self.history.push("");
        let result = self.edit_loop();
        self.history.pop_last();
        result
    }

    fn edit_loop(&mut self) -> Result<String, ReadError> {
        // A key accepted out of the completion cycle is dispatched here
        // on the next iteration instead of being read from the input.
        let mut pending: Option<Key> = None;
        loop {
            let key = match pending.take() {
                Some(key) => key,
                None => match keys::read_key(&mut self.input)? {
                    Some(key) => key,
                    // EOF mid-edit: commit what is there; with nothing
                    // typed, report end of input.
                    None => {
                        return if self.line.is_empty() {
                            Err(ReadError::Eof)
                        } else {
                            Ok(self.line.text())
                        };
                    }
                },
            };

            match key {
                Key::Tab => {
                    if self.line.is_empty() {
                        continue;
                    }
                    if self.line.last_space_before_cursor().is_some() {
                        self.complete_path()?;
                    } else if let Some(accepted) = self.complete_command()? {
                        pending = Some(accepted);
                    }
                }
                Key::Enter => return Ok(self.line.text()),
                Key::CtrlC => return Err(ReadError::Interrupted),
                Key::CtrlD => {
                    if self.line.is_empty() {
                        return Err(ReadError::Eof);
                    }
                    self.line.delete_at_cursor();
                    self.refresh()?;
                }
                Key::CtrlA | Key::Home => {
                    self.line.move_home();
                    self.refresh()?;
                }
                Key::CtrlE | Key::End => {
                    self.line.move_end();
                    self.refresh()?;
                }
                Key::CtrlB | Key::Left => {
                    self.line.move_left();
                    self.refresh()?;
                }
                Key::CtrlF | Key::Right => {
                    self.line.move_right();
                    self.refresh()?;
                }
                Key::CtrlH | Key::Backspace => {
                    self.line.backspace();
                    self.refresh()?;
                }
                Key::Delete => {
                    self.line.delete_at_cursor();
                    self.refresh()?;
                }
                Key::CtrlK => {
                    self.line.kill_to_end();
                    self.refresh()?;
                }
                Key::CtrlU => {
                    self.line.clear();
                    self.refresh()?;
                }
                Key::CtrlT => {
                    self.line.transpose();
                    self.refresh()?;
                }
                Key::CtrlW => {
                    self.line.delete_prev_word();
                    self.refresh()?;
                }
                Key::CtrlL => {
                    ansi::clear_screen(&mut self.out)?;
                    self.refresh()?;
                }
                Key::CtrlP | Key::Up => {
                    self.recall_history(true);
                    self.refresh()?;
                }
                Key::CtrlN | Key::Down => {
                    self.recall_history(false);
                    self.refresh()?;
                }
                Key::CtrlG => {}
                Key::Char(b) => {
                    if self.line.insert(b) {
                        render::echo_byte(&mut self.out, b)?;
                    } else {
                        self.refresh()?;
                    }
                }
            }
        }
    }

    fn refresh(&mut self) -> io::Result<()> {
        render::refresh(&mut self.out, &self.prompt, &self.line)
    }

    // ── History navigation ──────────────────────────────────────────

    /// Move the history cursor one step and load that entry.
    ///
    /// The live buffer is stored into the current slot first, so leaving
    /// an edited entry and coming back preserves the edit. At the newest
    /// entry, "next" leaves the buffer unchanged; at the oldest,
    /// "previous" stays put.
    fn recall_history(&mut self, prev: bool) {
        if self.history.len() <= 1 {
            return;
        }
        let back = self.line.history_cursor();
        self.history.replace_back(back, &self.line.text());

        let target = if prev {
            if back + 1 >= self.history.len() {
                return;
            }
            back + 1
        } else {
            if back == 0 {
                return;
            }
            back - 1
        };

        self.line.set_history_cursor(target);
        if let Some(entry) = self.history.entry_back(target) {
            let entry = entry.to_owned();
            self.line.set_text(&entry);
        }
    }

    // ── Command completion ──────────────────────────────────────────

    /// Cycle through the vocabulary matches for the whole buffer.
    ///
    /// Each candidate is previewed in place; Tab advances (wrapping),
    /// ESC cancels back to the original line, and any other byte accepts
    /// the shown candidate and is returned for normal dispatch — a Space
    /// or Enter typed to accept is not lost.
    fn complete_command(&mut self) -> Result<Option<Key>, ReadError> {
        let words = self.tree.match_prefix(&self.line.text());
        if words.is_empty() {
            return Ok(None);
        }

        let mut i = 0;
        loop {
            // Preview candidate i, keeping the user's line as the saved
            // state to restore.
            self.saved.clone_from(&self.line);
            self.line.set_text(&words[i]);
            self.refresh()?;
            self.line.clone_from(&self.saved);

            let Some(b) = keys::read_byte(&mut self.input)? else {
                return Err(ReadError::Eof);
            };
            match b {
                0x09 => i = (i + 1) % words.len(),
                0x1B => {
                    self.refresh()?;
                    return Ok(None);
                }
                accepted => {
                    self.line.set_text(&words[i]);
                    return match keys::decode_byte(accepted, &mut self.input)? {
                        Decoded::Key(key) => Ok(Some(key)),
                        Decoded::Skip => {
                            self.refresh()?;
                            Ok(None)
                        }
                        Decoded::Eof => Err(ReadError::Eof),
                    };
                }
            }
        }
    }

    // ── Path completion ─────────────────────────────────────────────

    /// Complete the path token under the cursor: list a directory, or
    /// extend a filename prefix by the matches' common continuation.
    fn complete_path(&mut self) -> Result<(), ReadError> {
        let Some(space) = self.line.last_space_before_cursor() else {
            return Ok(());
        };
        let start = (space + 1).min(self.line.cursor());
        let token_bytes = self.line.as_bytes()[start..self.line.cursor()].to_vec();
        let token = String::from_utf8_lossy(&token_bytes).into_owned();
        let path = fscomplete::expand_token(&token);

        let mut listing = Vec::new();
        if token.is_empty() || path.is_dir() {
            let entries = fscomplete::files_in_dir(&path);
            listing = fscomplete::format_grid(&entries, &path, self.line.columns());
        } else {
            let matches = fscomplete::files_match_prefix(&path);
            if !matches.is_empty() {
                let parent = fscomplete::parent_dir(&path);
                listing =
                    fscomplete::format_grid(&matches, &parent, self.line.columns());

                let leaf_len = path
                    .file_name()
                    .map_or(0, |n| n.to_string_lossy().len());
                let continuation =
                    fscomplete::common_continuation(&matches, leaf_len);
                if !continuation.is_empty() {
                    self.line.insert_bytes(continuation.as_bytes());
                    // A lone directory match also gets its separator.
                    let mut extended = token.clone();
                    extended.push_str(&continuation);
                    if matches.len() == 1
                        && fscomplete::expand_token(&extended).is_dir()
                    {
                        self.line.insert(b'/');
                    }
                }
            }
        }

        if !listing.is_empty() {
            ansi::erase_to_eol(&mut listing)?;
            listing.push(b'\n');
            self.out.write_all(&listing)?;
        }
        self.refresh()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
