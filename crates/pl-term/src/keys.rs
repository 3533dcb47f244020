// SPDX-License-Identifier: MIT
//
// Key input — turns raw stdin bytes into editor keys.
//
// The editor runs the terminal with VMIN=1/VTIME=0, so input arrives one
// byte at a time from a blocking read. Classification:
//
// - Named control bytes (Ctrl-A .. Ctrl-H, Tab, Ctrl-K, Ctrl-L, Enter,
//   Ctrl-N, Ctrl-P, Ctrl-T, Ctrl-U, Ctrl-W, Backspace) map to dedicated
//   variants.
// - ESC (0x1B) introduces a CSI or SS3 sequence: two more bytes are read,
//   and `ESC [ <digit>` pulls a fourth byte expecting `~` (only `3~`,
//   Delete, is honored). Unrecognized sequences are consumed silently.
// - Every other byte is a printable `Char` inserted verbatim — the editor
//   is byte-level end to end.
//
// Unlike a buffered event parser, there is no lone-ESC timeout here: a
// bare Escape keypress blocks until the terminal sends the rest of a
// sequence or the user types two more bytes. That is the right trade for
// a line editor that owns the terminal while `readline` runs.

use std::io::{self, Read};

// ─── Key ────────────────────────────────────────────────────────────────────

/// A decoded input key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    // ── Control bytes ───────────────────────────────────────────
    /// Ctrl-A (0x01) — cursor to start of line.
    CtrlA,
    /// Ctrl-B (0x02) — cursor left.
    CtrlB,
    /// Ctrl-C (0x03) — interrupt.
    CtrlC,
    /// Ctrl-D (0x04) — delete at cursor, or EOF on an empty line.
    CtrlD,
    /// Ctrl-E (0x05) — cursor to end of line.
    CtrlE,
    /// Ctrl-F (0x06) — cursor right.
    CtrlF,
    /// Ctrl-G (0x07) — named but unbound.
    CtrlG,
    /// Ctrl-H (0x08) — delete before cursor, same as Backspace.
    CtrlH,
    /// Tab (0x09) — completion.
    Tab,
    /// Ctrl-K (0x0B) — truncate at cursor.
    CtrlK,
    /// Ctrl-L (0x0C) — clear screen.
    CtrlL,
    /// Enter (0x0D) — commit the line.
    Enter,
    /// Ctrl-N (0x0E) — next history entry.
    CtrlN,
    /// Ctrl-P (0x10) — previous history entry.
    CtrlP,
    /// Ctrl-T (0x14) — transpose characters.
    CtrlT,
    /// Ctrl-U (0x15) — clear the line.
    CtrlU,
    /// Ctrl-W (0x17) — delete the previous word.
    CtrlW,
    /// Backspace (0x7F) — delete before cursor.
    Backspace,
    // ── Escape sequences ────────────────────────────────────────
    /// `ESC [ 3 ~` — delete at cursor.
    Delete,
    /// `ESC [ A` — previous history entry.
    Up,
    /// `ESC [ B` — next history entry.
    Down,
    /// `ESC [ C` — cursor right.
    Right,
    /// `ESC [ D` — cursor left.
    Left,
    /// `ESC [ H` / `ESC O H` — cursor to start of line.
    Home,
    /// `ESC [ F` / `ESC O F` — cursor to end of line.
    End,
    // ── Everything else ─────────────────────────────────────────
    /// Any other byte, inserted verbatim.
    Char(u8),
}

/// Outcome of decoding one leading byte.
pub enum Decoded {
    /// A complete key.
    Key(Key),
    /// An unrecognized escape sequence was consumed; nothing to dispatch.
    Skip,
    /// The input ended in the middle of a sequence.
    Eof,
}

// ─── Reading ────────────────────────────────────────────────────────────────

/// Read exactly one byte. `Ok(None)` means end of input.
pub fn read_byte(r: &mut impl Read) -> io::Result<Option<u8>> {
    let mut b = [0u8; 1];
    match r.read(&mut b)? {
        0 => Ok(None),
        _ => Ok(Some(b[0])),
    }
}

/// Read and decode the next key. `Ok(None)` means end of input.
///
/// Unrecognized escape sequences are swallowed and reading continues, so
/// the caller only ever sees keys it can act on.
pub fn read_key(r: &mut impl Read) -> io::Result<Option<Key>> {
    loop {
        let Some(b) = read_byte(r)? else {
            return Ok(None);
        };
        match decode_byte(b, r)? {
            Decoded::Key(key) => return Ok(Some(key)),
            Decoded::Skip => {}
            Decoded::Eof => return Ok(None),
        }
    }
}

/// Decode a key given its first byte, pulling continuation bytes for
/// escape sequences from `r`.
///
/// Split out from [`read_key`] so the completion cycle, which reads its
/// own candidate-selection byte, can hand an accepted byte back through
/// the same classification.
pub fn decode_byte(b: u8, r: &mut impl Read) -> io::Result<Decoded> {
    let key = match b {
        0x01 => Key::CtrlA,
        0x02 => Key::CtrlB,
        0x03 => Key::CtrlC,
        0x04 => Key::CtrlD,
        0x05 => Key::CtrlE,
        0x06 => Key::CtrlF,
        0x07 => Key::CtrlG,
        0x08 => Key::CtrlH,
        0x09 => Key::Tab,
        0x0B => Key::CtrlK,
        0x0C => Key::CtrlL,
        0x0D => Key::Enter,
        0x0E => Key::CtrlN,
        0x10 => Key::CtrlP,
        0x14 => Key::CtrlT,
        0x15 => Key::CtrlU,
        0x17 => Key::CtrlW,
        0x7F => Key::Backspace,
        0x1B => return decode_escape(r),
        other => Key::Char(other),
    };
    Ok(Decoded::Key(key))
}

// ─── Escape sequences ───────────────────────────────────────────────────────

/// Decode the bytes following an ESC: CSI (`[`) or SS3 (`O`) sequences.
fn decode_escape(r: &mut impl Read) -> io::Result<Decoded> {
    let Some(first) = read_byte(r)? else {
        return Ok(Decoded::Eof);
    };
    let Some(second) = read_byte(r)? else {
        return Ok(Decoded::Eof);
    };

    match (first, second) {
        (b'[', b'0'..=b'9') => {
            // Extended sequence: one more byte, expecting `~`.
            let Some(third) = read_byte(r)? else {
                return Ok(Decoded::Eof);
            };
            if second == b'3' && third == b'~' {
                Ok(Decoded::Key(Key::Delete))
            } else {
                Ok(Decoded::Skip)
            }
        }
        (b'[', b'A') => Ok(Decoded::Key(Key::Up)),
        (b'[', b'B') => Ok(Decoded::Key(Key::Down)),
        (b'[', b'C') => Ok(Decoded::Key(Key::Right)),
        (b'[', b'D') => Ok(Decoded::Key(Key::Left)),
        (b'[', b'H') => Ok(Decoded::Key(Key::Home)),
        (b'[', b'F') => Ok(Decoded::Key(Key::End)),
        (b'O', b'H') => Ok(Decoded::Key(Key::Home)),
        (b'O', b'F') => Ok(Decoded::Key(Key::End)),
        _ => Ok(Decoded::Skip),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
