//! Production line transports.
//!
//! Both transports hand their blocking reads to a [`LineReader`] thread and
//! only differ in what they open and how a zero-byte read is interpreted.

use std::time::Duration;

use prt7_runtime::{LinePoll, Transport};

use crate::{
    DecoderError,
    line_reader::{LineReader, LineSource},
    serial::{self, SerialConfig},
};

/// Reads frames from a serial device.
///
/// The device is opened by [`Transport::connect`], so an absent device is
/// reported as a connection failure rather than at construction.
#[derive(Debug)]
pub struct SerialTransport {
    path: String,
    config: SerialConfig,
    poll_timeout: Duration,
    reader: Option<LineReader>,
}

impl SerialTransport {
    /// Transport for the device at `path`. `poll_timeout` bounds how long one
    /// `try_read_line` waits for a line.
    pub fn new(path: impl Into<String>, config: SerialConfig, poll_timeout: Duration) -> Self {
        Self { path: path.into(), config, poll_timeout, reader: None }
    }

    /// Device path
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Transport for SerialTransport {
    type Error = DecoderError;

    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async move {
            let device = serial::open(&self.path, &self.config)?;
            self.reader = Some(LineReader::spawn(device, LineSource::Device, self.poll_timeout)?);
            Ok(())
        }
    }

    fn is_ready(&self) -> bool {
        self.reader.is_some()
    }

    fn try_read_line(&mut self) -> impl Future<Output = Result<LinePoll, Self::Error>> + Send {
        read_from(self.reader.as_mut())
    }
}

/// Reads frames from standard input.
///
/// Useful for replaying captured sessions (`prt7-decoder --stdin < capture.log`).
/// End of input ends the stream immediately instead of waiting out the idle
/// threshold.
#[derive(Debug)]
pub struct StdinTransport {
    poll_timeout: Duration,
    reader: Option<LineReader>,
}

impl StdinTransport {
    /// Transport over this process's standard input.
    pub fn new(poll_timeout: Duration) -> Self {
        Self { poll_timeout, reader: None }
    }
}

impl Transport for StdinTransport {
    type Error = DecoderError;

    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let result = LineReader::spawn(std::io::stdin(), LineSource::Stream, self.poll_timeout)
            .map(|reader| {
                self.reader = Some(reader);
            });
        std::future::ready(result)
    }

    fn is_ready(&self) -> bool {
        self.reader.is_some()
    }

    fn try_read_line(&mut self) -> impl Future<Output = Result<LinePoll, Self::Error>> + Send {
        read_from(self.reader.as_mut())
    }
}

async fn read_from(reader: Option<&mut LineReader>) -> Result<LinePoll, DecoderError> {
    match reader {
        Some(reader) => reader.next().await,
        None => Err(DecoderError::NotConnected),
    }
}
