//! One-call scenario runner.
//!
//! Wires a [`SimTransport`], a [`SimEnv`] and a [`RecordingObserver`] into the
//! production [`Runtime`] and hands back everything a test wants to inspect.

use std::time::Duration;

use prt7_core::{Mapping, SessionConfig, SessionError};
use prt7_runtime::{RunReport, Runtime};

use crate::{RecordingObserver, SimEnv, SimTransport, SimTransportStats};

/// Everything left over after a scenario ran.
#[derive(Debug)]
pub struct ScenarioOutcome {
    /// What the runtime returned
    pub result: Result<RunReport, SessionError>,
    /// Observer notifications
    pub observer: RecordingObserver,
    /// Virtual clock after the run
    pub env: SimEnv,
    /// Transport poll counters
    pub stats: SimTransportStats,
}

impl ScenarioOutcome {
    /// Decoded message, if the run succeeded.
    pub fn message(&self) -> Option<&str> {
        self.result.as_ref().ok().map(|report| report.message.as_str())
    }
}

/// Scenario builder.
#[derive(Debug)]
pub struct Scenario {
    transport: SimTransport,
    config: SessionConfig,
}

impl Scenario {
    /// Scenario over this transport script with default session settings.
    pub fn new(transport: SimTransport) -> Self {
        Self { transport, config: SessionConfig::default() }
    }

    /// Consecutive empty polls that end the stream.
    #[must_use]
    pub fn idle_threshold(mut self, polls: u32) -> Self {
        self.config.idle_threshold = polls;
        self
    }

    /// Pause between empty polls.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Give up after this many empty polls if no frame has arrived.
    #[must_use]
    pub fn startup_idle_limit(mut self, polls: u32) -> Self {
        self.config.startup_idle_limit = Some(polls);
        self
    }

    /// Rotor mapping mode.
    #[must_use]
    pub fn mapping(mut self, mapping: Mapping) -> Self {
        self.config.mapping = mapping;
        self
    }

    /// Run to completion.
    pub async fn run(self) -> ScenarioOutcome {
        let env = SimEnv::new();
        let stats = self.transport.stats();
        let mut observer = RecordingObserver::new();

        let result = {
            let mut runtime = Runtime::new(self.transport, env.clone(), &mut observer, self.config);
            runtime.run().await
        };

        tracing::debug!(ok = result.is_ok(), polls = stats.polls(), "scenario finished");
        ScenarioOutcome { result, observer, env, stats }
    }
}
