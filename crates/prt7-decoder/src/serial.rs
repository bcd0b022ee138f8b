//! Serial device access.
//!
//! Opens the device without making it the controlling terminal and, on Unix,
//! puts the line into raw 8N1 mode with no flow control and a short read
//! timeout (`VMIN = 0`, `VTIME` from [`SerialConfig::read_timeout`]). A read
//! that times out returns zero bytes, which the line reader treats as "no data
//! yet".
//!
//! Other platforms open the device as a plain file and keep whatever line
//! settings it already has.

use std::{fs::File, time::Duration};

use crate::DecoderError;

/// Default line speed.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default time a device read waits for the first byte.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Serial line settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Line speed in baud
    pub baud_rate: u32,
    /// How long one read waits before returning no data
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baud_rate: DEFAULT_BAUD_RATE, read_timeout: DEFAULT_READ_TIMEOUT }
    }
}

impl SerialConfig {
    /// Read timeout in the tenths of a second termios counts in, clamped to
    /// `1..=255`.
    pub fn vtime(&self) -> u8 {
        (self.read_timeout.as_millis() / 100).clamp(1, 255) as u8
    }
}

/// Device read when no port is given.
pub fn default_port() -> &'static str {
    if cfg!(windows) { r"\\.\COM3" } else { "/dev/ttyUSB0" }
}

/// Open and configure a serial device.
///
/// # Errors
///
/// - `DecoderError::Open` if the device cannot be opened
/// - `DecoderError::UnsupportedBaud` if the baud rate has no termios speed
/// - `DecoderError::LineSettings` if the line settings cannot be applied
pub fn open(path: &str, config: &SerialConfig) -> Result<File, DecoderError> {
    let file = open_device(path)
        .map_err(|source| DecoderError::Open { path: path.to_string(), source })?;

    configure(&file, path, config)?;

    tracing::info!(path, baud = config.baud_rate, "serial port open");
    Ok(file)
}

#[cfg(unix)]
fn open_device(path: &str) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    use nix::fcntl::OFlag;

    std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags((OFlag::O_NOCTTY | OFlag::O_SYNC).bits())
        .open(path)
}

#[cfg(not(unix))]
fn open_device(path: &str) -> std::io::Result<File> {
    std::fs::OpenOptions::new().read(true).write(true).open(path)
}

#[cfg(unix)]
fn configure(file: &File, path: &str, config: &SerialConfig) -> Result<(), DecoderError> {
    use nix::sys::termios::{
        ControlFlags, InputFlags, SetArg, SpecialCharacterIndices, cfmakeraw, cfsetspeed,
        tcgetattr, tcsetattr,
    };

    let settings_error =
        |errno: nix::Error| DecoderError::LineSettings { path: path.to_string(), source: errno.into() };

    let speed = baud_rate(config.baud_rate)?;
    let mut tty = tcgetattr(file).map_err(settings_error)?;

    cfmakeraw(&mut tty);
    cfsetspeed(&mut tty, speed).map_err(settings_error)?;

    // 8N1, receiver on, modem lines ignored
    tty.control_flags &= !(ControlFlags::CSIZE
        | ControlFlags::PARENB
        | ControlFlags::PARODD
        | ControlFlags::CSTOPB);
    tty.control_flags |= ControlFlags::CS8 | ControlFlags::CLOCAL | ControlFlags::CREAD;
    tty.input_flags &= !(InputFlags::IXON | InputFlags::IXOFF | InputFlags::IXANY);

    tty.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
    tty.control_chars[SpecialCharacterIndices::VTIME as usize] = config.vtime();

    tcsetattr(file, SetArg::TCSANOW, &tty).map_err(settings_error)?;
    Ok(())
}

#[cfg(not(unix))]
fn configure(_file: &File, path: &str, config: &SerialConfig) -> Result<(), DecoderError> {
    tracing::warn!(path, baud = config.baud_rate, "line settings not applied on this platform");
    Ok(())
}

#[cfg(unix)]
fn baud_rate(rate: u32) -> Result<nix::sys::termios::BaudRate, DecoderError> {
    use nix::sys::termios::BaudRate;

    let speed = match rate {
        1200 => BaudRate::B1200,
        2400 => BaudRate::B2400,
        4800 => BaudRate::B4800,
        9600 => BaudRate::B9600,
        19200 => BaudRate::B19200,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        115_200 => BaudRate::B115200,
        other => return Err(DecoderError::UnsupportedBaud(other)),
    };
    Ok(speed)
}
