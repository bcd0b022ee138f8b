//! Generic runtime for session orchestration.
//!
//! The Runtime drives the decoding loop, coordinating between:
//! - [`Session`]: frame interpretation state machine
//! - [`Transport`]: platform-specific line source
//! - [`Environment`]: time and sleeping
//! - [`SessionObserver`]: progress output

use std::time::Duration;

use prt7_core::{
    Session, SessionAction, SessionConfig, SessionError, SessionObserver, env::Environment,
};

use crate::{LinePoll, Transport};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Frames parsed and applied
    pub frames_processed: u64,
    /// Malformed lines skipped
    pub rejected_lines: u64,
    /// Empty polls over the whole run
    pub idle_polls: u64,
    /// Decoded message as text
    pub message: String,
    /// Decoded message bytes
    pub bytes: Vec<u8>,
    /// Time from connection to end of stream
    pub elapsed: Duration,
}

/// Generic runtime that orchestrates Session, Transport and Environment.
///
/// # Type Parameters
///
/// - `T`: Line source
/// - `E`: Environment for time and sleeping
/// - `O`: Progress observer (`()` for none)
pub struct Runtime<T, E, O = ()>
where
    T: Transport,
    E: Environment,
    O: SessionObserver,
{
    transport: T,
    env: E,
    observer: O,
    session: Session,
}

impl<T, E, O> Runtime<T, E, O>
where
    T: Transport,
    E: Environment,
    O: SessionObserver,
{
    /// Create a new runtime with a fresh session.
    pub fn new(transport: T, env: E, observer: O, config: SessionConfig) -> Self {
        Self { transport, env, observer, session: Session::new(config) }
    }

    /// Run the session until the stream ends.
    ///
    /// This is the core orchestration loop that:
    /// 1. Connects the transport
    /// 2. Polls one line at a time and feeds it to the session
    /// 3. Executes the returned actions (observer calls, waits)
    /// 4. Stops when the session finishes
    ///
    /// # Errors
    ///
    /// - `SessionError::TransportUnavailable` if the transport cannot connect
    /// - `SessionError::EmptyStream` if the stream ended without a frame
    pub async fn run(&mut self) -> Result<RunReport, SessionError> {
        if let Err(err) = self.transport.connect().await {
            tracing::error!(error = %err, "failed to open transport");
            return Err(self.session.connect_failed(err.to_string()));
        }
        if !self.transport.is_ready() {
            tracing::error!("transport not ready after connect");
            return Err(self.session.connect_failed("transport not ready"));
        }
        self.session.connected()?;
        tracing::info!("waiting for frames");

        let started = self.env.now();
        let mut idle_polls = 0u64;

        loop {
            let actions = match self.transport.try_read_line().await {
                Ok(LinePoll::Line(line)) => self.session.handle_line(line)?,
                Ok(LinePoll::Empty) => {
                    idle_polls += 1;
                    self.session.handle_idle()?
                },
                Ok(LinePoll::Closed) => self.session.handle_end_of_input()?,
                Err(err) => {
                    tracing::warn!(error = %err, "transport read failed, ending stream");
                    self.session.handle_end_of_input()?
                },
            };

            if self.execute(actions).await {
                break;
            }
        }

        let elapsed = self.env.now() - started;
        let decoded = self.session.result()?;

        Ok(RunReport {
            frames_processed: decoded.frames_processed,
            rejected_lines: decoded.rejected_lines,
            idle_polls,
            message: decoded.text,
            bytes: decoded.bytes,
            elapsed,
        })
    }

    /// Execute session actions.
    ///
    /// Returns `true` once the session reports the stream finished.
    async fn execute(&mut self, actions: Vec<SessionAction>) -> bool {
        let mut finished = false;

        for action in actions {
            match action {
                SessionAction::FrameApplied { frame, report } => {
                    self.observer.on_frame_processed(&frame, &report);
                },
                SessionAction::Rejected { line, error } => {
                    self.observer.on_parse_failure(&line, &error);
                },
                SessionAction::Wait(duration) => self.env.sleep(duration).await,
                SessionAction::Finished { frames_processed, message } => {
                    self.observer.on_stream_finished(frames_processed, &message);
                    finished = true;
                },
            }
        }

        finished
    }

    /// Get a reference to the Session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get a reference to the Transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a reference to the observer
    pub fn observer(&self) -> &O {
        &self.observer
    }
}
