//! PRT-7 production decoder.
//!
//! Wraps the [`prt7_runtime::Runtime`] with real line sources and system time.
//!
//! # Components
//!
//! - [`SerialTransport`]: serial device, raw 8N1 on Unix
//! - [`StdinTransport`]: captured frames on standard input
//! - [`LineReader`]: blocking reads on a background thread
//! - [`SystemEnv`]: production environment (monotonic clock, tokio timer)
//! - [`decode`]: run one session to completion

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod line_reader;
pub mod serial;
mod system_env;
mod transport;

pub use error::DecoderError;
pub use line_reader::{LineReader, LineSource};
use prt7_core::{SessionConfig, SessionError};
use prt7_runtime::{RunReport, Runtime, TracingObserver, Transport};
pub use serial::SerialConfig;
pub use system_env::SystemEnv;
pub use transport::{SerialTransport, StdinTransport};

/// Decode one stream from `transport` under wall-clock time, logging progress
/// through `tracing`.
///
/// # Errors
///
/// - `SessionError::TransportUnavailable` if the transport cannot be opened
/// - `SessionError::EmptyStream` if the stream ends without a valid frame
pub async fn decode<T: Transport>(
    transport: T,
    config: SessionConfig,
) -> Result<RunReport, SessionError> {
    let mut runtime = Runtime::new(transport, SystemEnv::new(), TracingObserver::new(), config);
    runtime.run().await
}
