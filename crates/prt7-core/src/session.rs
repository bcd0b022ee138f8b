//! Session state machine.
//!
//! Owns the rotor and output buffer for one stream, dispatches frames to them
//! and decides when the stream has ended. Uses the action pattern: the driver
//! reports what the transport did (a line, no data, end of input) and executes
//! the returned actions. The session itself never sleeps or reads.
//!
//! # State Machine
//!
//! ```text
//! ┌────────────┐ connected ┌───────────┐ idle threshold ┌──────────┐        ┌──────────┐
//! │ Connecting │──────────>│ Listening │───────────────>│ Draining │───────>│ Finished │
//! └────────────┘           └───────────┘  end of input  └──────────┘        └──────────┘
//!       │                    │       ^
//!       │ connect failed     └───────┘ line / empty poll
//!       ↓
//!  ┌────────┐
//!  │ Failed │
//!  └────────┘
//! ```

use std::time::Duration;

use bytes::Bytes;
use prt7_proto::{Frame, ParseError};

use crate::{
    error::SessionError,
    output::OutputBuffer,
    rotor::{Mapping, Rotor},
};

/// Consecutive empty polls after which a stream with frames is considered
/// finished.
pub const DEFAULT_IDLE_THRESHOLD: u32 = 50;

/// Pause between empty polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the transport to become ready
    Connecting,
    /// Transport ready, consuming lines
    Listening,
    /// Stream judged finished, assembling the message
    Draining,
    /// Message assembled, session complete
    Finished,
    /// Transport never became ready
    Failed,
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Consecutive empty polls that end a stream once a frame has been
    /// processed.
    pub idle_threshold: u32,
    /// Pause requested after each empty poll that does not end the stream.
    pub poll_interval: Duration,
    /// Consecutive empty polls tolerated before the first frame arrives.
    /// `None` waits indefinitely.
    pub startup_idle_limit: Option<u32>,
    /// Rotor mapping mode.
    pub mapping: Mapping,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            poll_interval: DEFAULT_POLL_INTERVAL,
            startup_idle_limit: None,
            mapping: Mapping::default(),
        }
    }
}

/// Session state right after a frame was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    /// Frames processed so far, including this one
    pub frames_processed: u64,
    /// Decoded byte appended by a LOAD frame. `None` for MAP frames.
    pub decoded: Option<u8>,
    /// Letter under the rotor head after the frame
    pub head: u8,
    /// Bytes decoded so far
    pub message_len: usize,
}

/// Actions returned by the session for the driver to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// A frame was applied. Observational only.
    FrameApplied {
        /// The frame
        frame: Frame,
        /// Resulting state
        report: FrameReport,
    },

    /// A line could not be parsed and was skipped. Observational only.
    Rejected {
        /// The raw line
        line: Bytes,
        /// Why it was rejected
        error: ParseError,
    },

    /// Pause for this long before polling the transport again.
    Wait(Duration),

    /// The stream is over. No further polling should happen.
    Finished {
        /// Frames processed over the whole stream
        frames_processed: u64,
        /// Final decoded message
        message: String,
    },
}

/// Outcome of a successful session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Frames processed
    pub frames_processed: u64,
    /// Malformed lines skipped
    pub rejected_lines: u64,
    /// Decoded bytes
    pub bytes: Vec<u8>,
    /// Decoded message as text
    pub text: String,
}

/// Decoding session for a single stream.
///
/// This is a pure state machine: no I/O, no clock. The driver feeds it
/// transport outcomes and executes the returned [`SessionAction`]s.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    config: SessionConfig,
    rotor: Rotor,
    output: OutputBuffer,
    frames_processed: u64,
    idle_streak: u32,
    rejected_lines: u64,
    failure: Option<String>,
}

impl Session {
    /// Create a session in [`SessionState::Connecting`].
    pub fn new(config: SessionConfig) -> Self {
        Self {
            state: SessionState::Connecting,
            rotor: Rotor::new(config.mapping),
            config,
            output: OutputBuffer::new(),
            frames_processed: 0,
            idle_streak: 0,
            rejected_lines: 0,
            failure: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Cipher state
    pub fn rotor(&self) -> &Rotor {
        &self.rotor
    }

    /// Message decoded so far
    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    /// Frames successfully parsed and applied
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Consecutive empty polls since the last line
    pub fn idle_streak(&self) -> u32 {
        self.idle_streak
    }

    /// Malformed lines skipped
    pub fn rejected_lines(&self) -> u64 {
        self.rejected_lines
    }

    /// Transport is ready; start consuming lines.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if not in Connecting state
    pub fn connected(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::Connecting, "connect")?;
        self.transition(SessionState::Listening);
        Ok(())
    }

    /// Transport could not be acquired.
    ///
    /// Moves to [`SessionState::Failed`] and returns the error to report.
    /// Outside Connecting state the session is left untouched and an
    /// `InvalidState` error is returned instead.
    pub fn connect_failed(&mut self, reason: impl Into<String>) -> SessionError {
        if let Err(err) = self.expect_state(SessionState::Connecting, "fail connection") {
            return err;
        }

        let reason = reason.into();
        self.failure = Some(reason.clone());
        self.transition(SessionState::Failed);
        SessionError::TransportUnavailable { reason }
    }

    /// Process one line received from the transport.
    ///
    /// Resets the idle streak. A parsable line is applied to the rotor or
    /// output buffer; a malformed line is skipped and reported.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if not in Listening state
    pub fn handle_line(
        &mut self,
        line: impl Into<Bytes>,
    ) -> Result<Vec<SessionAction>, SessionError> {
        self.expect_state(SessionState::Listening, "handle_line")?;
        self.idle_streak = 0;

        let line = line.into();
        match prt7_proto::parse(&line) {
            Ok(frame) => {
                let report = self.apply(frame);
                Ok(vec![SessionAction::FrameApplied { frame, report }])
            },
            Err(error) => {
                self.rejected_lines += 1;
                tracing::debug!(line = ?line, %error, "skipping malformed line");
                Ok(vec![SessionAction::Rejected { line, error }])
            },
        }
    }

    /// The transport had no line available.
    ///
    /// Ends the stream once the idle threshold is reached after at least one
    /// frame (or the startup limit before any frame); otherwise asks the
    /// driver to wait one poll interval.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if not in Listening state
    pub fn handle_idle(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        self.expect_state(SessionState::Listening, "handle_idle")?;
        self.idle_streak = self.idle_streak.saturating_add(1);

        if self.frames_processed > 0 && self.idle_streak >= self.config.idle_threshold {
            tracing::debug!(idle_polls = self.idle_streak, "idle threshold reached");
            return Ok(self.finish());
        }

        if self.frames_processed == 0
            && let Some(limit) = self.config.startup_idle_limit
            && self.idle_streak >= limit
        {
            tracing::debug!(idle_polls = self.idle_streak, "no frame before startup limit");
            return Ok(self.finish());
        }

        Ok(vec![SessionAction::Wait(self.config.poll_interval)])
    }

    /// The transport reached the end of its input.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if not in Listening state
    pub fn handle_end_of_input(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        self.expect_state(SessionState::Listening, "handle_end_of_input")?;
        tracing::debug!("transport input exhausted");
        Ok(self.finish())
    }

    /// Final outcome of the session.
    ///
    /// # Errors
    ///
    /// - `SessionError::EmptyStream` if finished without any frame
    /// - `SessionError::TransportUnavailable` if the session failed to connect
    /// - `SessionError::InvalidState` if the session has not ended yet
    pub fn result(&self) -> Result<DecodedMessage, SessionError> {
        match self.state {
            SessionState::Finished if self.frames_processed == 0 => {
                Err(SessionError::EmptyStream { rejected: self.rejected_lines })
            },
            SessionState::Finished => Ok(DecodedMessage {
                frames_processed: self.frames_processed,
                rejected_lines: self.rejected_lines,
                bytes: self.output.as_bytes().to_vec(),
                text: self.output.render_full(),
            }),
            SessionState::Failed => Err(SessionError::TransportUnavailable {
                reason: self.failure.clone().unwrap_or_default(),
            }),
            state => Err(SessionError::InvalidState { state, operation: "take result" }),
        }
    }

    fn apply(&mut self, frame: Frame) -> FrameReport {
        let decoded = match frame {
            Frame::Load(byte) => {
                let decoded = self.rotor.map(byte);
                self.output.append(decoded);
                Some(decoded)
            },
            Frame::Map(amount) => {
                self.rotor.rotate(amount);
                None
            },
        };
        self.frames_processed += 1;

        FrameReport {
            frames_processed: self.frames_processed,
            decoded,
            head: self.rotor.head(),
            message_len: self.output.len(),
        }
    }

    fn finish(&mut self) -> Vec<SessionAction> {
        self.transition(SessionState::Draining);
        let message = self.output.render_full();
        self.transition(SessionState::Finished);

        vec![SessionAction::Finished { frames_processed: self.frames_processed, message }]
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = ?self.state, to = ?next, "session state change");
        self.state = next;
    }

    fn expect_state(
        &self,
        expected: SessionState,
        operation: &'static str,
    ) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState { state: self.state, operation })
        }
    }
}
