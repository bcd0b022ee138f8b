//! PRT-7 frame interpretation engine.
//!
//! Pure state machines for decoding a PRT-7 stream. Nothing in this crate
//! performs I/O: the [`Session`] receives lines and idle notifications as
//! method calls and returns [`SessionAction`]s for a driver to execute.
//!
//! # Architecture
//!
//! ```text
//! transport ─> line ─> parse ─> Frame ─┬─ Load(c) ─> OutputBuffer.append(Rotor.map(c))
//!                                      └─ Map(n)  ─> Rotor.rotate(n)
//! ```
//!
//! # Components
//!
//! - [`Rotor`]: rotating substitution cipher over a fixed circular alphabet
//! - [`OutputBuffer`]: append-only decoded message
//! - [`Session`]: lifecycle, dispatch and idle-timeout end-of-stream policy
//! - [`SessionObserver`]: optional progress hook
//! - [`env::Environment`]: time and sleeping, abstracted for simulation

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod error;
mod observer;
mod output;
mod rotor;
mod session;

pub use error::SessionError;
pub use observer::SessionObserver;
pub use output::OutputBuffer;
pub use rotor::{ALPHABET, Mapping, Rotor};
pub use session::{
    DEFAULT_IDLE_THRESHOLD, DEFAULT_POLL_INTERVAL, DecodedMessage, FrameReport, Session,
    SessionAction, SessionConfig, SessionState,
};
