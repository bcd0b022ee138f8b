//! Environment abstraction for deterministic testing.
//!
//! Decouples the session loop from wall-clock time. Production uses real time
//! and a real sleep; the simulation harness uses a virtual clock so idle
//! timeouts can be tested without waiting.

use std::time::Duration;

/// Abstract environment providing time and async sleeping.
///
/// # Invariants
///
/// - `now()` never goes backwards
/// - `sleep(d)` advances `now()` by at least `d` once it completes
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`, simulation
    /// environments use virtual time.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only driver code sleeps. The session state machine asks for a pause by
    /// returning [`crate::SessionAction::Wait`].
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}
