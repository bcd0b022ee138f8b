//! PRT-7 decoder binary.
//!
//! # Usage
//!
//! ```bash
//! # Read the platform's default serial device
//! prt7-decoder
//!
//! # Read a specific device at a different speed
//! prt7-decoder /dev/ttyACM0 --baud 115200
//!
//! # Replay a captured stream
//! prt7-decoder --stdin < capture.log
//! ```
//!
//! The decoded message is written to stdout; progress goes to the log.
//! Exits with 1 if the device cannot be opened or no valid frame arrives.

use std::{io::Write, process::ExitCode, time::Duration};

use clap::{Parser, ValueEnum};
use prt7_core::{DEFAULT_IDLE_THRESHOLD, Mapping, SessionConfig, SessionError};
use prt7_decoder::{SerialConfig, SerialTransport, StdinTransport, serial};
use prt7_runtime::RunReport;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Rotor mapping selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum MappingArg {
    /// Input letter position counted forward from the head
    Shift,
    /// Legacy lookup that returns every letter unchanged
    Literal,
}

impl From<MappingArg> for Mapping {
    fn from(arg: MappingArg) -> Self {
        match arg {
            MappingArg::Shift => Mapping::Shift,
            MappingArg::Literal => Mapping::Literal,
        }
    }
}

/// PRT-7 stream decoder
#[derive(Parser, Debug)]
#[command(name = "prt7-decoder")]
#[command(about = "Decode a PRT-7 frame stream into its hidden message")]
#[command(version)]
struct Args {
    /// Serial device to read (platform default if omitted)
    port: Option<String>,

    /// Read frames from standard input instead of a serial device
    #[arg(long, conflicts_with = "port")]
    stdin: bool,

    /// Serial line speed
    #[arg(long, default_value_t = serial::DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Consecutive empty polls that end the stream
    #[arg(long, default_value_t = DEFAULT_IDLE_THRESHOLD)]
    idle_threshold: u32,

    /// Pause between empty polls, in milliseconds
    #[arg(long, default_value = "100")]
    poll_interval_ms: u64,

    /// How long one poll waits for a line, in milliseconds
    #[arg(long, default_value = "500")]
    read_timeout_ms: u64,

    /// Give up after this many empty polls if no frame has arrived
    #[arg(long)]
    wait_limit: Option<u32>,

    /// Rotor mapping
    #[arg(long, value_enum, default_value = "shift")]
    mapping: MappingArg,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!("PRT-7 decoder starting");

    let config = SessionConfig {
        idle_threshold: args.idle_threshold,
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        startup_idle_limit: args.wait_limit,
        mapping: args.mapping.into(),
    };
    let read_timeout = Duration::from_millis(args.read_timeout_ms);

    let result = if args.stdin {
        tracing::info!("reading frames from stdin");
        prt7_decoder::decode(StdinTransport::new(read_timeout), config).await
    } else {
        let port = match args.port {
            Some(port) => port,
            None => {
                let port = serial::default_port();
                tracing::info!(port, "no port given, using default");
                port.to_string()
            },
        };
        let serial = SerialConfig { baud_rate: args.baud, read_timeout };
        let transport = SerialTransport::new(port, serial, read_timeout);
        tracing::info!(port = transport.path(), "connecting");
        prt7_decoder::decode(transport, config).await
    };

    match result {
        Ok(report) => {
            if let Err(err) = print_message(&report) {
                tracing::error!(error = %err, "failed to write message");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        },
        Err(err @ SessionError::TransportUnavailable { .. }) => {
            tracing::error!(error = %err, "could not connect to the serial device");
            ExitCode::FAILURE
        },
        Err(err @ SessionError::EmptyStream { .. }) => {
            tracing::warn!(error = %err, "no frames received; check the sender is transmitting");
            ExitCode::FAILURE
        },
        Err(err) => {
            tracing::error!(error = %err, "decoding failed");
            ExitCode::FAILURE
        },
    }
}

fn print_message(report: &RunReport) -> std::io::Result<()> {
    tracing::info!(
        frames = report.frames_processed,
        rejected = report.rejected_lines,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "stream finished"
    );

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", report.message)?;
    stdout.flush()
}
