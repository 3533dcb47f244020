//! Single-line repaint.
//!
//! One frame is: carriage return, the prompt, a window into the buffer,
//! erase-to-end-of-line, then a cursor-positioning escape. The window
//! always contains the cursor: when `prompt + cursor` would pass the
//! right edge the window slides right one cell at a time, and the tail
//! is truncated to the terminal width.
//!
//! The whole frame is assembled into one buffer and issued as a single
//! write so a repaint is atomic from the terminal's point of view.

use std::io::{self, Write};

use pl_term::ansi;

use crate::line::LineBuffer;

// ---------------------------------------------------------------------------
// Window arithmetic
// ---------------------------------------------------------------------------

/// Visible slice of the buffer: `(start, len, screen_col)`.
///
/// `screen_col` is the 0-indexed terminal column the cursor lands on
/// after the repaint. With `avail = columns − prompt_len` cells for the
/// buffer, the window starts at `cursor + 1 − avail` once the cursor
/// would fall past the right edge, so the cursor sits on the last cell
/// and the view slides by exactly one per keystroke.
fn window(prompt_len: usize, line: &LineBuffer) -> (usize, usize, usize) {
    let avail = line.columns().saturating_sub(prompt_len);
    if avail == 0 {
        return (line.cursor(), 0, prompt_len.min(line.columns()));
    }
    let start = if line.cursor() >= avail {
        line.cursor() + 1 - avail
    } else {
        0
    };
    let len = (line.len() - start).min(avail);
    (start, len, prompt_len + line.cursor() - start)
}

// ---------------------------------------------------------------------------
// Repaint
// ---------------------------------------------------------------------------

/// Repaint the current line: prompt, visible buffer window, cursor.
///
/// # Errors
///
/// Propagates write failures from the output stream.
pub fn refresh(
    w: &mut impl Write,
    prompt: &str,
    line: &LineBuffer,
) -> io::Result<()> {
    let (start, len, screen_col) = window(prompt.len(), line);

    let mut frame = Vec::with_capacity(prompt.len() + len + 16);
    ansi::carriage_return(&mut frame)?;
    frame.extend_from_slice(prompt.as_bytes());
    frame.extend_from_slice(&line.as_bytes()[start..start + len]);
    ansi::erase_to_eol(&mut frame)?;
    ansi::cursor_to_col(&mut frame, screen_col)?;

    w.write_all(&frame)?;
    w.flush()
}

/// Fast path for a byte appended at the end of a visible line: echo the
/// byte alone instead of repainting the frame.
///
/// # Errors
///
/// Propagates write failures from the output stream.
pub fn echo_byte(w: &mut impl Write, b: u8) -> io::Result<()> {
    w.write_all(&[b])?;
    w.flush()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, cursor: usize, columns: usize) -> LineBuffer {
        let mut l = LineBuffer::new(columns);
        l.set_text(text);
        l.set_history_cursor(0);
        for _ in cursor..text.len() {
            l.move_left();
        }
        l
    }

    fn paint(prompt: &str, l: &LineBuffer) -> String {
        let mut out = Vec::new();
        refresh(&mut out, prompt, l).unwrap();
        String::from_utf8(out).unwrap()
    }

    // -- window -------------------------------------------------------------

    #[test]
    fn window_everything_fits() {
        let l = line("hello", 5, 80);
        assert_eq!(window(2, &l), (0, 5, 7));
    }

    #[test]
    fn window_cursor_mid_line() {
        let l = line("hello", 2, 80);
        assert_eq!(window(2, &l), (0, 5, 4));
    }

    #[test]
    fn window_cursor_at_right_edge_slides_by_one() {
        // 10 columns, prompt 2 → 8 cells for the buffer. Cursor at 8
        // would land on column 10 (off screen), so the window starts
        // at 1 and the cursor sits on the last cell.
        let l = line("abcdefghij", 8, 10);
        assert_eq!(window(2, &l), (1, 8, 9));
    }

    #[test]
    fn window_cursor_at_end_of_long_line() {
        let l = line("abcdefghij", 10, 10);
        assert_eq!(window(2, &l), (3, 7, 9));
    }

    #[test]
    fn window_tail_truncated() {
        // Cursor at home, line longer than the view: show the head.
        let l = line("abcdefghij", 0, 10);
        assert_eq!(window(2, &l), (0, 8, 2));
    }

    #[test]
    fn window_degenerate_width() {
        let l = line("abc", 1, 2);
        assert_eq!(window(2, &l), (1, 0, 2));
    }

    // -- frames -------------------------------------------------------------

    #[test]
    fn frame_short_line() {
        let l = line("hi", 2, 80);
        assert_eq!(paint("> ", &l), "\r> hi\x1b[0K\r\x1b[4C");
    }

    #[test]
    fn frame_empty_line() {
        let l = line("", 0, 80);
        assert_eq!(paint("> ", &l), "\r> \x1b[0K\r\x1b[2C");
    }

    #[test]
    fn frame_empty_prompt_empty_line_emits_no_forward() {
        let l = line("", 0, 80);
        assert_eq!(paint("", &l), "\r\x1b[0K\r");
    }

    #[test]
    fn frame_cursor_mid_line() {
        let l = line("hello", 3, 80);
        assert_eq!(paint("> ", &l), "\r> hello\x1b[0K\r\x1b[5C");
    }

    #[test]
    fn frame_window_slid_right() {
        let l = line("abcdefghij", 10, 10);
        assert_eq!(paint("> ", &l), "\r> defghij\x1b[0K\r\x1b[9C");
    }

    #[test]
    fn frame_tail_truncated() {
        let l = line("abcdefghij", 0, 10);
        assert_eq!(paint("> ", &l), "\r> abcdefgh\x1b[0K\r\x1b[2C");
    }

    // -- echo ---------------------------------------------------------------

    #[test]
    fn echo_byte_writes_exactly_one_byte() {
        let mut out = Vec::new();
        echo_byte(&mut out, b'x').unwrap();
        assert_eq!(out, b"x");
    }
}
