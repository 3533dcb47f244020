// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — callers assemble repaints and listings
// out of these pieces. This module just knows the byte-level encoding of
// every terminal command the editor needs.
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to a `Vec<u8>` frame buffer.

use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to the left margin (plain carriage return).
#[inline]
pub fn carriage_return(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\r")
}

/// Move the cursor forward (right) by `n` columns (CUF).
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: usize) -> io::Result<()> {
    write!(w, "\x1b[{n}C")
}

/// Move the cursor back (left) by `n` columns (CUB).
#[inline]
pub fn cursor_back(w: &mut impl Write, n: usize) -> io::Result<()> {
    write!(w, "\x1b[{n}D")
}

/// Push the cursor to the right edge of the screen.
///
/// 999 exceeds any realistic terminal width; the cursor stops at the last
/// column. Used by the width probe when the window-size ioctl fails.
#[inline]
pub fn cursor_far_right(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[999C")
}

/// Move the cursor to 0-indexed column `n` on the current row.
///
/// Emitted as carriage return + cursor forward, which is how the repaint
/// positions the cursor after redrawing the line. Column 0 is just the
/// carriage return — `CUF 0` would still move one cell on most terminals.
#[inline]
pub fn cursor_to_col(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        w.write_all(b"\r")
    } else {
        write!(w, "\r\x1b[{n}C")
    }
}

/// Request a cursor position report (DSR 6).
///
/// The terminal replies on stdin with `ESC [ row ; col R`.
#[inline]
pub fn cursor_report_request(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[6n")
}

// ─── Erasing ─────────────────────────────────────────────────────────────────

/// Erase from the cursor to the end of the line (EL 0).
#[inline]
pub fn erase_to_eol(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0K")
}

/// Move the cursor home and erase the whole display (CUP + ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H\x1b[2J")
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// Begin the directory-entry highlight: bold blue on the default background.
#[inline]
pub fn dir_highlight(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[34;1;49m")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn sgr_reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn carriage_return_sequence() {
        assert_eq!(emit(carriage_return), "\r");
    }

    #[test]
    fn cursor_forward_one() {
        assert_eq!(emit(|w| cursor_forward(w, 1)), "\x1b[1C");
    }

    #[test]
    fn cursor_forward_many() {
        assert_eq!(emit(|w| cursor_forward(w, 42)), "\x1b[42C");
    }

    #[test]
    fn cursor_back_sequence() {
        assert_eq!(emit(|w| cursor_back(w, 7)), "\x1b[7D");
    }

    #[test]
    fn cursor_far_right_sequence() {
        assert_eq!(emit(cursor_far_right), "\x1b[999C");
    }

    #[test]
    fn cursor_to_col_zero_is_bare_cr() {
        assert_eq!(emit(|w| cursor_to_col(w, 0)), "\r");
    }

    #[test]
    fn cursor_to_col_nonzero() {
        assert_eq!(emit(|w| cursor_to_col(w, 5)), "\r\x1b[5C");
    }

    #[test]
    fn cursor_report_request_sequence() {
        assert_eq!(emit(cursor_report_request), "\x1b[6n");
    }

    // ── Erasing ─────────────────────────────────────────────────────────

    #[test]
    fn erase_to_eol_sequence() {
        assert_eq!(emit(erase_to_eol), "\x1b[0K");
    }

    #[test]
    fn clear_screen_sequence() {
        assert_eq!(emit(clear_screen), "\x1b[H\x1b[2J");
    }

    // ── Colors ──────────────────────────────────────────────────────────

    #[test]
    fn dir_highlight_sequence() {
        assert_eq!(emit(dir_highlight), "\x1b[34;1;49m");
    }

    #[test]
    fn sgr_reset_sequence() {
        assert_eq!(emit(sgr_reset), "\x1b[0m");
    }

    // ── Composition ─────────────────────────────────────────────────────

    #[test]
    fn repaint_tail_composes() {
        let mut buf = Vec::new();
        erase_to_eol(&mut buf).unwrap();
        cursor_to_col(&mut buf, 10).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "\x1b[0K\r\x1b[10C");
    }
}
