//! Decoder error types.

use std::io;

use thiserror::Error;

/// Errors from the production transports.
#[derive(Error, Debug)]
pub enum DecoderError {
    /// The serial device could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        /// Device path
        path: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The device opened but its line settings could not be applied.
    #[error("failed to configure {path}: {source}")]
    LineSettings {
        /// Device path
        path: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// No termios speed matches the requested baud rate.
    #[error("unsupported baud rate {0}")]
    UnsupportedBaud(u32),

    /// The background reader thread could not be started.
    #[error("failed to start reader thread: {0}")]
    ReaderSpawn(#[source] io::Error),

    /// Reading from the line source failed.
    #[error("read failed: {0}")]
    Read(#[from] io::Error),

    /// `try_read_line` was called before a successful `connect`.
    #[error("transport not connected")]
    NotConnected,
}
