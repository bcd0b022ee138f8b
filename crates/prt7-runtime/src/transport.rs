//! Transport trait for abstracting line sources.
//!
//! The [`Transport`] trait decouples the runtime from where lines come from.
//! The serial device, standard input and the simulation harness each
//! implement it, while the generic [`crate::Runtime`] handles orchestration.

use std::future::Future;

use bytes::Bytes;

/// Result of asking the transport for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinePoll {
    /// One complete line, without terminator.
    Line(Bytes),
    /// No line available within the transport's read timeout.
    Empty,
    /// The underlying input is exhausted; no more lines will arrive.
    Closed,
}

/// Source of newline-terminated lines.
///
/// # Implementations
///
/// - **Serial**: reads a configured serial device
/// - **Stdin**: reads captured frames from standard input
/// - **Simulation**: replays a scripted sequence of polls
pub trait Transport: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Acquire the underlying line source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be opened.
    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Check if the transport can deliver lines.
    fn is_ready(&self) -> bool;

    /// Request one line.
    ///
    /// Returns immediately with a line, or reports [`LinePoll::Empty`] after
    /// at most the transport's read timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the source fails.
    fn try_read_line(&mut self) -> impl Future<Output = Result<LinePoll, Self::Error>> + Send;
}
