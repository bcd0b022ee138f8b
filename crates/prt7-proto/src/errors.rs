//! Protocol error types.

use thiserror::Error;

/// Result alias for frame parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Reasons a line could not be turned into a [`crate::Frame`].
///
/// All variants are recoverable: the offending line is skipped and the stream
/// keeps decoding.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The line contained no bytes.
    #[error("empty line")]
    Empty,

    /// The first byte is not a known frame kind.
    #[error("unknown frame kind {kind:#04x}")]
    UnknownKind {
        /// Byte found in the kind position
        kind: u8,
    },

    /// The kind byte is not followed by a `,`.
    #[error("missing ',' separator after frame kind")]
    MissingSeparator,

    /// A LOAD frame ended before its payload byte.
    #[error("load frame has no payload")]
    MissingPayload,
}
