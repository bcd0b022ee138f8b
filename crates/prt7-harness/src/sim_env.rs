//! Simulation environment with a virtual clock.
//!
//! `SimEnv` implements [`Environment`] without touching the system clock:
//!
//! - Time starts at zero and only moves when something sleeps
//! - `sleep()` advances the clock by the full duration and completes at once
//!
//! A run that would wait five seconds of idle polls in production completes
//! instantly here, with the same observable timing.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use prt7_core::env::Environment;

#[derive(Debug, Default)]
struct Clock {
    nanos: AtomicU64,
    sleeps: AtomicU64,
}

/// Virtual-time environment for deterministic tests.
///
/// Clones share the same clock.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    clock: Arc<Clock>,
}

impl SimEnv {
    /// Create an environment at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward without counting a sleep.
    pub fn advance(&self, duration: Duration) {
        self.clock.nanos.fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Virtual time since creation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.clock.nanos.load(Ordering::SeqCst))
    }

    /// Number of completed `sleep()` calls.
    pub fn sleep_count(&self) -> u64 {
        self.clock.sleeps.load(Ordering::SeqCst)
    }
}

impl Environment for SimEnv {
    type Instant = Duration;

    fn now(&self) -> Self::Instant {
        self.elapsed()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        self.advance(duration);
        self.clock.sleeps.fetch_add(1, Ordering::SeqCst);
        std::future::ready(())
    }
}
