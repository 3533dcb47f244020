// SPDX-License-Identifier: MIT
//
// pl-term — Terminal control layer for promptline.
//
// Raw-mode termios handling, byte-level key decoding, and ANSI escape
// emission for a single-line editor. This crate intentionally avoids
// terminal abstraction frameworks (crossterm, termion) in favor of
// direct POSIX calls and hand-written escape sequences: a line editor
// lives or dies by exactly which bytes it reads and writes, so every
// one of them is spelled out here and tested.

pub mod ansi;
pub mod keys;
pub mod terminal;
