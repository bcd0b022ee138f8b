//! Error types for the PRT-7 session.
//!
//! Malformed frames are not errors at this level: they are reported through
//! [`crate::SessionAction::Rejected`] and decoding continues. The errors here
//! end a run.

use thiserror::Error;

use crate::session::SessionState;

/// Errors that end a decoding session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The transport could not be acquired; no frames were processed.
    #[error("transport unavailable: {reason}")]
    TransportUnavailable {
        /// Why the transport could not be used
        reason: String,
    },

    /// The stream ended before any frame was processed.
    #[error("stream ended without any valid frame ({rejected} malformed lines)")]
    EmptyStream {
        /// Malformed lines seen before the stream ended
        rejected: u64,
    },

    /// A session method was called in a state that does not accept it.
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// Current state when the call was made
        state: SessionState,
        /// Operation that was attempted
        operation: &'static str,
    },
}

impl SessionError {
    /// Returns true if the run failed before the transport became usable.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::TransportUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_errors_are_connection_failures() {
        assert!(
            SessionError::TransportUnavailable { reason: "no such device".to_string() }
                .is_connection_failure()
        );
        assert!(!SessionError::EmptyStream { rejected: 3 }.is_connection_failure());
        assert!(
            !SessionError::InvalidState { state: SessionState::Finished, operation: "poll" }
                .is_connection_failure()
        );
    }

    #[test]
    fn messages_name_the_cause() {
        let err = SessionError::InvalidState {
            state: SessionState::Connecting,
            operation: "handle_line",
        };
        assert_eq!(err.to_string(), "invalid state transition: cannot handle_line from Connecting");
    }
}
