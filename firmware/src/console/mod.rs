//! Line assembly for the fixture's UART console.
//!
//! The console task reads raw UART bytes and feeds them through
//! [`LineBuffer`] to recover whole command lines for the shared grammar in
//! `modem-core`. Kept free of hardware types so the logic is testable on the
//! host.

#![allow(dead_code)]

use heapless::String;

/// Maximum console line length; longer lines are discarded whole.
pub const MAX_LINE_LEN: usize = 80;

/// Accumulates bytes into terminated command lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String<MAX_LINE_LEN>,
    overflowed: bool,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            pending: String::new(),
            overflowed: false,
        }
    }

    /// Feeds one byte, returning a completed line on CR or LF.
    ///
    /// Empty lines and lines that overflowed the buffer yield `None`; the
    /// overflow is swallowed so the next line starts clean.
    pub fn push(&mut self, byte: u8) -> Option<String<MAX_LINE_LEN>> {
        match byte {
            b'\r' | b'\n' => {
                let overflowed = core::mem::take(&mut self.overflowed);
                let line = core::mem::take(&mut self.pending);
                if overflowed || line.trim().is_empty() {
                    None
                } else {
                    Some(line)
                }
            }
            _ => {
                if !byte.is_ascii() || byte.is_ascii_control() {
                    return None;
                }
                if self.pending.push(byte as char).is_err() {
                    self.overflowed = true;
                }
                None
            }
        }
    }
}
