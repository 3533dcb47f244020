// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, width query, and restore-on-drop.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd reads/writes. These
// are the standard POSIX interfaces for terminal control — there is no
// safe alternative. Each unsafe block is minimal and documented.
#![allow(unsafe_code)]
//
// The editor borrows the terminal for the duration of one `readline`
// call: raw mode in, edit, raw mode out. The original termios settings
// are saved on the first raw-mode entry and restored on `leave_raw` and
// again on drop, so a panic or early return never leaves the user's
// shell without echo.
//
// Width discovery is two-tier: the TIOCGWINSZ ioctl, then a cursor
// round-trip probe (ask for the cursor position, jump to the far right,
// ask again, jump back). If both fail the width is assumed to be 80.

use std::io;

/// Width reported when both the ioctl and the cursor probe fail.
const DEFAULT_COLUMNS: usize = 80;

/// `TERM` values that cannot handle the escape sequences the editor emits.
const UNSUPPORTED_TERMS: &[&str] = &["dumb", "cons25", "emacs"];

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Handle on the input TTY with raw-mode state.
///
/// Holds the input and output file descriptors plus the termios settings
/// saved before the first raw-mode entry. Restoration is idempotent and
/// also runs on drop.
pub struct Terminal {
    /// Input fd — the one placed in raw mode and probed with `isatty`.
    infd: libc::c_int,
    /// Output fd — used for the size ioctl and the cursor probe writes.
    outfd: libc::c_int,
    /// Original termios, present once raw mode has been entered.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,
}

impl Terminal {
    /// Handle on stdin/stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fds(libc::STDIN_FILENO, libc::STDOUT_FILENO)
    }

    /// Handle on explicit file descriptors (e.g. `/dev/tty`).
    #[must_use]
    pub fn with_fds(infd: libc::c_int, outfd: libc::c_int) -> Self {
        Self {
            infd,
            outfd,
            #[cfg(unix)]
            original_termios: None,
        }
    }

    /// Whether the input fd is a terminal.
    #[cfg(unix)]
    #[must_use]
    pub fn is_tty(&self) -> bool {
        unsafe { libc::isatty(self.infd) != 0 }
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn is_tty(&self) -> bool {
        false
    }

    /// Whether `TERM` names a terminal the editor can drive.
    ///
    /// Unset `TERM` counts as supported; only the known-bare terminals
    /// (`dumb`, `cons25`, `emacs`) are rejected.
    #[must_use]
    pub fn is_supported_term(&self) -> bool {
        term_is_supported(std::env::var("TERM").ok().as_deref())
    }

    // ── Raw mode (termios) ──────────────────────────────────────────

    /// Enter raw mode.
    ///
    /// Saves the current termios on the first call, then disables
    /// canonical mode, echo, signal generation (Ctrl-C/Z arrive as
    /// bytes), CR→NL input translation, parity checks, flow control,
    /// and output post-processing; sets 8-bit chars and VMIN=1/VTIME=0
    /// so reads return on every single byte. Committed with TCSAFLUSH.
    ///
    /// # Errors
    ///
    /// Returns an error if the fd is not a TTY or a termios call fails.
    #[cfg(unix)]
    pub fn enter_raw(&mut self) -> io::Result<()> {
        if !self.is_tty() {
            return Err(io::Error::from_raw_os_error(libc::ENOTTY));
        }

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(self.infd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            // Save the original once; later calls keep the first copy.
            if self.original_termios.is_none() {
                self.original_termios = Some(termios);
            }

            // Input: no break signaling, no CR→NL, no parity check, no
            // 8th-bit stripping, no flow control.
            termios.c_iflag &= !(libc::BRKINT
                | libc::ICRNL
                | libc::INPCK
                | libc::ISTRIP
                | libc::IXON);
            // Output: no post-processing.
            termios.c_oflag &= !libc::OPOST;
            // Control: 8-bit chars.
            termios.c_cflag |= libc::CS8;
            // Local: no echo, no canonical mode, no extended input
            // processing, no signal chars.
            termios.c_lflag &=
                !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
            // Read returns after one byte, with no timer.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(self.infd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn enter_raw(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "raw mode requires a POSIX terminal",
        ))
    }

    /// Restore the termios saved by [`enter_raw`](Self::enter_raw).
    ///
    /// Idempotent; a no-op if raw mode was never entered. The saved
    /// settings are kept so drop can restore again as a safety net.
    #[cfg(unix)]
    pub fn leave_raw(&mut self) {
        if let Some(ref original) = self.original_termios {
            unsafe {
                let _ = libc::tcsetattr(self.infd, libc::TCSAFLUSH, original);
            }
        }
    }

    #[cfg(not(unix))]
    pub fn leave_raw(&mut self) {}

    // ── Width ───────────────────────────────────────────────────────

    /// Terminal width in columns.
    ///
    /// Primary query is the TIOCGWINSZ ioctl; on failure the cursor
    /// probe runs; if that also fails, 80.
    #[cfg(unix)]
    #[must_use]
    pub fn columns(&mut self) -> usize {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::ioctl(self.outfd, libc::TIOCGWINSZ, &raw mut ws) };
        if rc == 0 && ws.ws_col > 0 {
            return ws.ws_col as usize;
        }
        self.probe_columns().unwrap_or(DEFAULT_COLUMNS)
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn columns(&mut self) -> usize {
        DEFAULT_COLUMNS
    }

    /// Discover the width by cursor round-trip.
    ///
    /// Reads the current column, jumps to the far right edge, reads the
    /// column again (= the width), then moves the cursor back where it
    /// was. Requires raw mode, otherwise the position report cannot be
    /// read byte-wise.
    #[cfg(unix)]
    fn probe_columns(&mut self) -> Option<usize> {
        let start = self.cursor_column()?;

        let mut seq = Vec::new();
        crate::ansi::cursor_far_right(&mut seq).ok()?;
        self.write_raw(&seq)?;

        let cols = self.cursor_column()?;
        if cols > start {
            let mut back = Vec::new();
            crate::ansi::cursor_back(&mut back, cols - start).ok()?;
            self.write_raw(&back)?;
        }
        Some(cols)
    }

    /// Ask the terminal where the cursor is and return the column.
    #[cfg(unix)]
    fn cursor_column(&mut self) -> Option<usize> {
        let mut req = Vec::new();
        crate::ansi::cursor_report_request(&mut req).ok()?;
        self.write_raw(&req)?;

        // Reply: ESC [ row ; col R
        let mut reply = [0u8; 32];
        let mut len = 0;
        while len < reply.len() {
            let mut b = [0u8; 1];
            let n = unsafe {
                libc::read(self.infd, b.as_mut_ptr().cast::<libc::c_void>(), 1)
            };
            if n != 1 || b[0] == b'R' {
                break;
            }
            reply[len] = b[0];
            len += 1;
        }

        parse_cursor_report(&reply[..len]).map(|(_, col)| col)
    }

    /// Write all bytes to the output fd, bypassing stdio buffering.
    #[cfg(unix)]
    fn write_raw(&self, bytes: &[u8]) -> Option<()> {
        let mut written = 0;
        while written < bytes.len() {
            let n = unsafe {
                libc::write(
                    self.outfd,
                    bytes[written..].as_ptr().cast::<libc::c_void>(),
                    bytes.len() - written,
                )
            };
            if n <= 0 {
                return None;
            }
            written += n as usize;
        }
        Some(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.leave_raw();
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Whether a `TERM` value names a terminal the editor can drive.
fn term_is_supported(term: Option<&str>) -> bool {
    match term {
        Some(t) => !UNSUPPORTED_TERMS.contains(&t),
        None => true,
    }
}

/// Parse a cursor position report, minus the trailing `R`:
/// `ESC [ row ; col` → `(row, col)`.
fn parse_cursor_report(reply: &[u8]) -> Option<(usize, usize)> {
    let rest = reply.strip_prefix(b"\x1b[")?;
    let sep = rest.iter().position(|&b| b == b';')?;
    let row = parse_decimal(&rest[..sep])?;
    let col = parse_decimal(&rest[sep + 1..])?;
    Some((row, col))
}

/// Parse a non-empty all-digit byte slice.
fn parse_decimal(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut val = 0usize;
    for &d in digits {
        val = val.checked_mul(10)?.checked_add(usize::from(d - b'0'))?;
    }
    Some(val)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
