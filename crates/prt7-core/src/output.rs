//! Decoded message buffer.

/// Append-only sequence of decoded bytes, in LOAD-frame arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one decoded byte at the end.
    pub fn append(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Number of decoded bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if nothing has been decoded yet.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decoded bytes in insertion order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The whole message as text.
    ///
    /// Each byte becomes the character with the same code point, so bytes
    /// above 0x7F never turn into replacement characters and the output keeps
    /// one character per decoded byte.
    pub fn render_full(&self) -> String {
        self.bytes.iter().copied().map(char::from).collect()
    }

    /// Progress view with every character bracketed, e.g. `[H][O]`.
    pub fn render_partial(&self) -> String {
        let mut out = String::with_capacity(self.bytes.len() * 3);
        for &byte in &self.bytes {
            out.push('[');
            out.push(char::from(byte));
            out.push(']');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let buffer = OutputBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.render_full(), "");
        assert_eq!(buffer.render_partial(), "");
    }

    #[test]
    fn keeps_append_order() {
        let mut buffer = OutputBuffer::new();
        for byte in *b"HOLA MUNDO" {
            buffer.append(byte);
        }
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer.as_bytes(), b"HOLA MUNDO");
        assert_eq!(buffer.render_full(), "HOLA MUNDO");
    }

    #[test]
    fn partial_render_brackets_each_character() {
        let mut buffer = OutputBuffer::new();
        buffer.append(b'H');
        buffer.append(b' ');
        buffer.append(b'O');
        insta::assert_snapshot!(buffer.render_partial(), @"[H][ ][O]");
    }

    #[test]
    fn partial_render_keeps_high_bytes() {
        let mut buffer = OutputBuffer::new();
        buffer.append(0xE9);
        buffer.append(b'[');
        assert_eq!(buffer.render_partial(), "[\u{e9}][[]");
    }

    #[test]
    fn high_bytes_render_one_char_each() {
        let mut buffer = OutputBuffer::new();
        buffer.append(0xE9);
        buffer.append(b'!');
        assert_eq!(buffer.render_full(), "\u{e9}!");
        assert_eq!(buffer.render_full().chars().count(), buffer.len());
    }
}
