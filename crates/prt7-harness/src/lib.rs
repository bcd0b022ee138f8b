//! Deterministic simulation harness for PRT-7 sessions.
//!
//! Simulation implementations of the Environment and Transport traits, so the
//! production [`prt7_runtime::Runtime`] can be driven through exact, scripted
//! sequences of lines and empty polls under a virtual clock.
//!
//! # Components
//!
//! - [`SimEnv`]: virtual clock; sleeping advances time instantly
//! - [`SimTransport`]: scripted line source with shared poll statistics
//! - [`RecordingObserver`]: captures observer notifications for assertions
//! - [`Scenario`]: wires the above into a single run

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod recorder;
pub mod scenario;
pub mod sim_env;
pub mod sim_transport;

pub use recorder::{Observed, RecordingObserver};
pub use scenario::{Scenario, ScenarioOutcome};
pub use sim_env::SimEnv;
pub use sim_transport::{SimTransport, SimTransportError, SimTransportStats};
