//! Background line reader.
//!
//! Blocking reads run on a dedicated thread that splits bytes into lines with
//! [`LineAssembler`] and hands them over a bounded channel. The async side
//! waits on the channel with a timeout, so a poll never blocks longer than the
//! configured poll timeout.
//!
//! A plain thread is used rather than `spawn_blocking`: a read on standard
//! input can block forever, and the runtime must still be able to shut down.

use std::{io::Read, thread, time::Duration};

use bytes::Bytes;
use prt7_proto::{LineAssembler, MAX_LINE_LEN};
use prt7_runtime::LinePoll;
use tokio::sync::mpsc;

use crate::DecoderError;

/// Lines buffered between the reader thread and the runtime.
const CHANNEL_CAPACITY: usize = 64;

/// Pause after a zero-byte device read, for devices without a read timeout.
const DEVICE_IDLE_BACKOFF: Duration = Duration::from_millis(10);

/// What a zero-byte read means for this source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSource {
    /// A device with a read timeout: zero bytes means no data yet. Any
    /// partial line is delivered as-is.
    Device,
    /// A byte stream: zero bytes means end of input.
    Stream,
}

#[derive(Debug)]
enum ReaderEvent {
    Line(Bytes),
    Failed(std::io::Error),
}

/// Async handle to a line-reading thread.
#[derive(Debug)]
pub struct LineReader {
    lines: mpsc::Receiver<ReaderEvent>,
    poll_timeout: Duration,
}

impl LineReader {
    /// Start reading `reader` on a new thread.
    ///
    /// # Errors
    ///
    /// Returns `DecoderError::ReaderSpawn` if the thread cannot be created.
    pub fn spawn<R>(reader: R, source: LineSource, poll_timeout: Duration) -> Result<Self, DecoderError>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        thread::Builder::new()
            .name("prt7-reader".to_string())
            .spawn(move || read_loop(reader, source, &tx))
            .map_err(DecoderError::ReaderSpawn)?;

        Ok(Self { lines: rx, poll_timeout })
    }

    /// Wait up to the poll timeout for the next line.
    ///
    /// Returns [`LinePoll::Closed`] once the reader thread has exited and
    /// every line it produced has been delivered.
    ///
    /// # Errors
    ///
    /// Returns `DecoderError::Read` if the underlying read failed.
    pub async fn next(&mut self) -> Result<LinePoll, DecoderError> {
        match tokio::time::timeout(self.poll_timeout, self.lines.recv()).await {
            Ok(Some(ReaderEvent::Line(line))) => Ok(LinePoll::Line(line)),
            Ok(Some(ReaderEvent::Failed(err))) => Err(DecoderError::Read(err)),
            Ok(None) => Ok(LinePoll::Closed),
            Err(_elapsed) => Ok(LinePoll::Empty),
        }
    }
}

fn read_loop<R: Read>(mut reader: R, source: LineSource, tx: &mpsc::Sender<ReaderEvent>) {
    let mut assembler = LineAssembler::new();
    let mut chunk = [0u8; MAX_LINE_LEN + 1];

    loop {
        match reader.read(&mut chunk) {
            Ok(0) => {
                while let Some(line) = assembler.flush() {
                    if tx.blocking_send(ReaderEvent::Line(line)).is_err() {
                        return;
                    }
                }
                match source {
                    LineSource::Stream => {
                        tracing::debug!("reader reached end of input");
                        return;
                    },
                    LineSource::Device => {
                        if tx.is_closed() {
                            return;
                        }
                        thread::sleep(DEVICE_IDLE_BACKOFF);
                    },
                }
            },
            Ok(n) => {
                assembler.push(&chunk[..n]);
                while let Some(line) = assembler.next_line() {
                    if tx.blocking_send(ReaderEvent::Line(line)).is_err() {
                        return;
                    }
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {},
            Err(err) => {
                tracing::debug!(error = %err, "reader stopped");
                let _ = tx.blocking_send(ReaderEvent::Failed(err));
                return;
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const POLL: Duration = Duration::from_millis(200);

    async fn collect(reader: &mut LineReader) -> Vec<LinePoll> {
        let mut polls = Vec::new();
        loop {
            let poll = reader.next().await.unwrap();
            let closed = poll == LinePoll::Closed;
            polls.push(poll);
            if closed {
                return polls;
            }
        }
    }

    #[tokio::test]
    async fn stream_lines_then_closed() {
        let input = Cursor::new(b"L,H\r\nL,O\n\nM,2\nL,A".to_vec());
        let mut reader = LineReader::spawn(input, LineSource::Stream, POLL).unwrap();

        assert_eq!(collect(&mut reader).await, vec![
            LinePoll::Line(Bytes::from_static(b"L,H")),
            LinePoll::Line(Bytes::from_static(b"L,O")),
            LinePoll::Line(Bytes::from_static(b"M,2")),
            LinePoll::Line(Bytes::from_static(b"L,A")),
            LinePoll::Closed,
        ]);
    }

    #[tokio::test]
    async fn read_failure_is_reported() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("unplugged"))
            }
        }

        let mut reader = LineReader::spawn(Broken, LineSource::Stream, POLL).unwrap();
        assert!(matches!(reader.next().await, Err(DecoderError::Read(_))));
        assert_eq!(reader.next().await.unwrap(), LinePoll::Closed);
    }

    #[tokio::test]
    async fn silent_device_polls_empty() {
        let mut reader =
            LineReader::spawn(std::io::empty(), LineSource::Device, Duration::from_millis(20))
                .unwrap();
        assert_eq!(reader.next().await.unwrap(), LinePoll::Empty);
    }
}
