//! # pl-line — Single-line terminal editor for promptline
//!
//! The editing and completion layer on top of [`pl_term`]:
//!
//! - **[`radix`]** — compressed prefix tree over the registered command
//!   vocabulary
//! - **[`history`]** — bounded FIFO of entered lines with file persistence
//! - **[`line`]** — the in-memory edit buffer: bytes, cursor, width
//! - **[`render`]** — single-line repaint with a sliding window
//! - **[`fscomplete`]** — directory listing and filename-prefix extension
//! - **[`editor`]** — the `Prompt` coordinator that owns all of the above
//!   and turns keystrokes into one returned line at a time
//!
//! The whole crate is byte-level: buffer contents are opaque bytes, cursor
//! positions are byte offsets, and one byte is assumed to occupy one
//! terminal cell. Completed lines cross the API boundary as `String` via a
//! lossy conversion.

pub mod editor;
pub mod fscomplete;
pub mod history;
pub mod line;
pub mod radix;
pub mod render;
