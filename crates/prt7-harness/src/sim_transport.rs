//! Scripted line transport.
//!
//! `SimTransport` replays a fixed script of polls. Once the script runs out
//! it keeps answering with its tail: empty polls forever (a silent device) or
//! end of input (a closed pipe).
//!
//! Poll statistics live behind a shared handle so a test can still read them
//! after the transport has been moved into a runtime.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use bytes::Bytes;
use prt7_proto::{Frame, LineAssembler};
use prt7_runtime::{LinePoll, Transport};
use thiserror::Error;

/// Errors produced by the scripted transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimTransportError {
    /// The script refuses the connection.
    #[error("connection refused: {0}")]
    Refused(String),

    /// The script injects a read failure.
    #[error("read failed: {0}")]
    Read(String),
}

#[derive(Debug, Clone)]
enum Step {
    Poll(LinePoll),
    ReadError(String),
}

#[derive(Debug, Default)]
struct Counters {
    connects: AtomicU64,
    polls: AtomicU64,
    lines: AtomicU64,
    empty: AtomicU64,
    tail_polls: AtomicU64,
}

/// Shared view of a [`SimTransport`]'s poll counters.
#[derive(Debug, Clone, Default)]
pub struct SimTransportStats {
    counters: Arc<Counters>,
}

impl SimTransportStats {
    /// Connection attempts
    pub fn connects(&self) -> u64 {
        self.counters.connects.load(Ordering::SeqCst)
    }

    /// Total `try_read_line` calls
    pub fn polls(&self) -> u64 {
        self.counters.polls.load(Ordering::SeqCst)
    }

    /// Polls that delivered a line
    pub fn lines(&self) -> u64 {
        self.counters.lines.load(Ordering::SeqCst)
    }

    /// Polls that reported no data
    pub fn empty_polls(&self) -> u64 {
        self.counters.empty.load(Ordering::SeqCst)
    }

    /// Polls answered after the script ran out
    pub fn tail_polls(&self) -> u64 {
        self.counters.tail_polls.load(Ordering::SeqCst)
    }
}

/// Scripted transport for deterministic tests.
#[derive(Debug)]
pub struct SimTransport {
    script: VecDeque<Step>,
    close_at_end: bool,
    refuse: Option<String>,
    ready: bool,
    connected: bool,
    stats: SimTransportStats,
}

impl Default for SimTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SimTransport {
    /// Empty script that idles forever once exhausted.
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            close_at_end: false,
            refuse: None,
            ready: true,
            connected: false,
            stats: SimTransportStats::default(),
        }
    }

    /// Script that delivers these lines, in order.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Bytes>,
    {
        Self::new().lines(lines)
    }

    /// Deliver one line.
    #[must_use]
    pub fn line(mut self, line: impl Into<Bytes>) -> Self {
        self.script.push_back(Step::Poll(LinePoll::Line(line.into())));
        self
    }

    /// Deliver these lines, in order.
    #[must_use]
    pub fn lines<I, L>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Bytes>,
    {
        self.script.extend(lines.into_iter().map(|l| Step::Poll(LinePoll::Line(l.into()))));
        self
    }

    /// Deliver the wire encoding of these frames.
    #[must_use]
    pub fn frames<I: IntoIterator<Item = Frame>>(self, frames: I) -> Self {
        self.lines(frames.into_iter().map(|frame| frame.encode()))
    }

    /// Deliver the lines contained in raw wire bytes, split the way a serial
    /// reader would split them (CR/LF terminators, empty lines dropped).
    #[must_use]
    pub fn wire(self, bytes: &[u8]) -> Self {
        let mut assembler = LineAssembler::new();
        assembler.push(bytes);
        let lines: Vec<Bytes> = std::iter::from_fn(|| assembler.flush()).collect();
        self.lines(lines)
    }

    /// Answer `count` polls with no data.
    #[must_use]
    pub fn idle(mut self, count: usize) -> Self {
        self.script.extend(std::iter::repeat_n(Step::Poll(LinePoll::Empty), count));
        self
    }

    /// Fail the next read with this message.
    #[must_use]
    pub fn read_error(mut self, message: impl Into<String>) -> Self {
        self.script.push_back(Step::ReadError(message.into()));
        self
    }

    /// Report end of input once the script is exhausted.
    #[must_use]
    pub fn then_close(mut self) -> Self {
        self.close_at_end = true;
        self
    }

    /// Report no data forever once the script is exhausted (the default).
    #[must_use]
    pub fn then_idle(mut self) -> Self {
        self.close_at_end = false;
        self
    }

    /// Refuse to connect.
    #[must_use]
    pub fn refuse_connection(mut self, reason: impl Into<String>) -> Self {
        self.refuse = Some(reason.into());
        self
    }

    /// Connect successfully but report not ready.
    #[must_use]
    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    /// Shared statistics handle.
    pub fn stats(&self) -> SimTransportStats {
        self.stats.clone()
    }

    fn next_step(&mut self) -> Step {
        if let Some(step) = self.script.pop_front() {
            return step;
        }

        self.stats.counters.tail_polls.fetch_add(1, Ordering::SeqCst);
        if self.close_at_end { Step::Poll(LinePoll::Closed) } else { Step::Poll(LinePoll::Empty) }
    }
}

impl Transport for SimTransport {
    type Error = SimTransportError;

    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        self.stats.counters.connects.fetch_add(1, Ordering::SeqCst);
        let result = match &self.refuse {
            Some(reason) => Err(SimTransportError::Refused(reason.clone())),
            None => {
                self.connected = true;
                Ok(())
            },
        };
        std::future::ready(result)
    }

    fn is_ready(&self) -> bool {
        self.connected && self.ready
    }

    fn try_read_line(&mut self) -> impl Future<Output = Result<LinePoll, Self::Error>> + Send {
        self.stats.counters.polls.fetch_add(1, Ordering::SeqCst);

        let result = match self.next_step() {
            Step::Poll(poll) => {
                let counters = &self.stats.counters;
                match &poll {
                    LinePoll::Line(_) => counters.lines.fetch_add(1, Ordering::SeqCst),
                    LinePoll::Empty => counters.empty.fetch_add(1, Ordering::SeqCst),
                    LinePoll::Closed => 0,
                };
                Ok(poll)
            },
            Step::ReadError(message) => Err(SimTransportError::Read(message)),
        };
        std::future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_then_idles() {
        let mut transport = SimTransport::from_lines(["L,A"]).idle(1);
        let stats = transport.stats();
        transport.connect().await.unwrap();

        assert_eq!(transport.try_read_line().await, Ok(LinePoll::Line(Bytes::from("L,A"))));
        assert_eq!(transport.try_read_line().await, Ok(LinePoll::Empty));
        assert_eq!(transport.try_read_line().await, Ok(LinePoll::Empty));

        assert_eq!(stats.polls(), 3);
        assert_eq!(stats.lines(), 1);
        assert_eq!(stats.empty_polls(), 2);
        assert_eq!(stats.tail_polls(), 1);
    }

    #[tokio::test]
    async fn closes_when_asked() {
        let mut transport = SimTransport::new().then_close();
        transport.connect().await.unwrap();
        assert_eq!(transport.try_read_line().await, Ok(LinePoll::Closed));
    }

    #[tokio::test]
    async fn wire_bytes_are_split_into_lines() {
        let mut transport = SimTransport::new().wire(b"L,H\r\n\r\nM,2\nL,A").then_close();
        transport.connect().await.unwrap();

        let mut lines = Vec::new();
        while let Ok(LinePoll::Line(line)) = transport.try_read_line().await {
            lines.push(line);
        }
        assert_eq!(lines, vec!["L,H", "M,2", "L,A"]);
    }

    #[tokio::test]
    async fn refused_connection_is_not_ready() {
        let mut transport = SimTransport::new().refuse_connection("unplugged");
        let result = transport.connect().await;
        assert_eq!(result, Err(SimTransportError::Refused("unplugged".to_string())));
        assert!(!transport.is_ready());
    }
}
