//! Runtime for PRT-7 decoding sessions.
//!
//! Connects the pure [`prt7_core::Session`] state machine to a line source,
//! enabling deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`Transport`]: Trait for platform-specific line sources
//! - [`Runtime`]: Generic orchestration loop using Transport and Environment
//! - [`TracingObserver`]: Progress output through `tracing`

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod observer;
mod runtime;
mod transport;

pub use observer::TracingObserver;
pub use runtime::{RunReport, Runtime};
pub use transport::{LinePoll, Transport};
