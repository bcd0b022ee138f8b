//! Protocol instructions.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

/// One parsed PRT-7 instruction.
///
/// Frames are plain values: they own nothing beyond their scalar payload and
/// are consumed exactly once by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Decode this raw byte and append it to the message.
    ///
    /// The byte is taken verbatim from the wire and may be any value, not
    /// only a letter.
    Load(u8),

    /// Rotate the cipher by this many positions (negative rotates backwards).
    Map(i64),
}

/// Discriminant of a [`Frame`], as it appears in the first byte of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// `L` frame
    Load,
    /// `M` frame
    Map,
}

impl FrameKind {
    /// Wire tag for this kind.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Load => b'L',
            Self::Map => b'M',
        }
    }

    /// Kind for a wire tag. `None` for anything other than `L` or `M`.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'L' => Some(Self::Load),
            b'M' => Some(Self::Map),
            _ => None,
        }
    }
}

impl Frame {
    /// Kind of this frame.
    pub const fn kind(&self) -> FrameKind {
        match self {
            Self::Load(_) => FrameKind::Load,
            Self::Map(_) => FrameKind::Map,
        }
    }

    /// Encode the frame as a wire line, without the line terminator.
    ///
    /// `parse(&frame.encode())` yields the same frame.
    pub fn encode(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(8);
        self.encode_into(&mut dst);
        dst.freeze()
    }

    /// Append the wire form of the frame to `dst`, without a terminator.
    pub fn encode_into(&self, dst: &mut impl BufMut) {
        dst.put_u8(self.kind().tag());
        dst.put_u8(b',');
        match self {
            Self::Load(byte) => dst.put_u8(*byte),
            Self::Map(amount) => dst.put_slice(amount.to_string().as_bytes()),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(byte) => write!(f, "L,{}", char::from(*byte)),
            Self::Map(amount) => write!(f, "M,{amount}"),
        }
    }
}
