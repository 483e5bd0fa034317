//! Event-stream line splitting and frame decoding.
//!
//! The wire format is a sequence of text lines of the form `field: value`.
//! A blank line terminates a frame. Lines beginning with `:` are comments.
//! Only the `event`, `data` and `metadata` fields are recognized; anything
//! else is skipped without failing the stream.

use super::{FrameMode, StreamEvent};

// ─────────────────────────────────────────────────────────────────────────────
// Line Splitter
// ─────────────────────────────────────────────────────────────────────────────

/// Splits an incrementally delivered byte stream into text lines.
///
/// Accepts `\n`, `\r\n` and a lone `\r` as terminators. Bytes are buffered
/// until a terminator arrives, so lines and multi-byte characters may be
/// split across chunks freely.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buffer: Vec<u8>,
    pending_cr: bool,
}

impl LineSplitter {
    /// Create an empty splitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &byte in chunk {
            if self.pending_cr {
                self.pending_cr = false;
                if byte == b'\n' {
                    continue;
                }
            }

            match byte {
                b'\n' => lines.push(self.take_line()),
                b'\r' => {
                    lines.push(self.take_line());
                    self.pending_cr = true;
                }
                _ => self.buffer.push(byte),
            }
        }

        lines
    }

    /// Return the trailing unterminated line, if any.
    pub fn finish(&mut self) -> Option<String> {
        self.pending_cr = false;
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.take_line())
        }
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        line
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame Decoder
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Event,
    Data,
    Metadata,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "event" => Some(Field::Event),
            "data" => Some(Field::Data),
            "metadata" => Some(Field::Metadata),
            _ => None,
        }
    }
}

/// Split a non-blank line into its field name and value.
///
/// Returns `None` for comment lines. One space after the colon is dropped.
fn parse_field(line: &str) -> Option<(&str, &str)> {
    if line.starts_with(':') {
        return None;
    }

    match line.split_once(':') {
        Some((name, value)) => Some((name, value.strip_prefix(' ').unwrap_or(value))),
        None => Some((line, "")),
    }
}

/// Turns lines into [`StreamEvent`] records.
///
/// Holds at most one in-flight accumulator. Never yields an event whose
/// fields are all empty.
#[derive(Debug)]
pub struct FrameDecoder {
    mode: FrameMode,
    pending: StreamEvent,
    has_data: bool,
}

impl FrameDecoder {
    /// Create a decoder for the given framing mode.
    pub fn new(mode: FrameMode) -> Self {
        Self {
            mode,
            pending: StreamEvent::default(),
            has_data: false,
        }
    }

    /// The framing mode in use.
    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    /// Feed one line (without its terminator).
    ///
    /// Returns a completed event when the line finishes one.
    pub fn feed_line(&mut self, line: &str) -> Option<StreamEvent> {
        if line.is_empty() {
            return self.flush();
        }

        let (name, value) = parse_field(line)?;
        let field = Field::from_name(name)?;

        match self.mode {
            FrameMode::Batched => {
                self.apply(field, value);
                None
            }
            FrameMode::Eager => {
                self.reset();
                self.apply(field, value);
                self.flush()
            }
        }
    }

    /// Signal a clean end of input.
    ///
    /// Returns the pending frame if the server closed the stream without a
    /// trailing blank line.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        self.flush()
    }

    /// Drop the in-flight accumulator without emitting it.
    pub fn reset(&mut self) {
        self.pending = StreamEvent::default();
        self.has_data = false;
    }

    fn apply(&mut self, field: Field, value: &str) {
        match field {
            Field::Event => self.pending.event = value.to_string(),
            Field::Metadata => self.pending.metadata = value.to_string(),
            Field::Data => {
                if self.has_data {
                    self.pending.data.push('\n');
                }
                self.pending.data.push_str(value);
                self.has_data = true;
            }
        }
    }

    fn flush(&mut self) -> Option<StreamEvent> {
        let event = std::mem::take(&mut self.pending);
        self.has_data = false;
        if event.is_empty() { None } else { Some(event) }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new(FrameMode::default())
    }
}
