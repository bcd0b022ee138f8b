//! Incremental line splitting for raw transport bytes.
//!
//! Serial links deliver bytes in arbitrary chunks. [`LineAssembler`] buffers
//! them and yields one line at a time:
//!
//! - `\n` and `\r` both terminate a line, so CRLF senders work unchanged
//! - empty lines are skipped
//! - a line longer than [`MAX_LINE_LEN`] is cut at that length and the
//!   remainder starts the next line

use bytes::{Buf, Bytes, BytesMut};

/// Maximum number of bytes in one line.
pub const MAX_LINE_LEN: usize = 255;

/// Buffers transport bytes and splits them into lines.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: BytesMut,
}

impl LineAssembler {
    /// Create an empty assembler.
    pub fn new() -> Self {
        Self { buf: BytesMut::with_capacity(MAX_LINE_LEN + 1) }
    }

    /// Append raw bytes from the transport.
    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Number of bytes buffered and not yet returned.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Next complete line, without its terminator.
    ///
    /// Returns `None` when the buffered bytes do not yet form a line.
    pub fn next_line(&mut self) -> Option<Bytes> {
        self.skip_terminators();

        let scan = self.buf.len().min(MAX_LINE_LEN);
        if let Some(end) = self.buf[..scan].iter().position(|&b| is_terminator(b)) {
            let line = self.buf.split_to(end).freeze();
            self.buf.advance(1);
            return Some(line);
        }

        if self.buf.len() >= MAX_LINE_LEN {
            return Some(self.buf.split_to(MAX_LINE_LEN).freeze());
        }

        None
    }

    /// Take whatever partial line is buffered.
    ///
    /// Used when the transport reports a read timeout or end of input while a
    /// line is still incomplete. Returns `None` if nothing but terminators is
    /// buffered.
    pub fn flush(&mut self) -> Option<Bytes> {
        if let Some(line) = self.next_line() {
            return Some(line);
        }
        if self.buf.is_empty() {
            return None;
        }
        Some(self.buf.split().freeze())
    }

    fn skip_terminators(&mut self) {
        let leading = self.buf.iter().take_while(|&&b| is_terminator(b)).count();
        self.buf.advance(leading);
    }
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}
