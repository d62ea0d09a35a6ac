//! Mixing session configuration

use serde::{Deserialize, Serialize};

use evmix_core::{EventId, MixError, MixResult, RunNumber, Timestamp};

/// Mixing session configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixConfig {
    /// Run number of the first run
    pub start_run: RunNumber,
    /// Absolute time at which the first run starts
    pub start_timestamp: Timestamp,
    /// Event id of the first emitted record
    pub start_event_id: EventId,
    /// Records per run before moving to the next run
    pub max_events_per_run: Option<u64>,
    /// Number of runs before the session ends
    pub max_runs: Option<u32>,
    /// Simulated seconds per run before moving to the next run
    pub max_run_seconds: Option<f64>,
    /// Pace emission against the wall clock
    pub realtime: bool,
    /// Base seed for source clocks; entropy when unset
    pub seed: Option<u64>,
}

impl Default for MixConfig {
    fn default() -> Self {
        MixConfig {
            start_run: RunNumber::new(1),
            start_timestamp: Timestamp::ZERO,
            start_event_id: EventId::ZERO,
            max_events_per_run: None,
            max_runs: None,
            max_run_seconds: None,
            realtime: false,
            seed: None,
        }
    }
}

impl MixConfig {
    /// Parse from JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> MixResult<Self> {
        let config: MixConfig =
            serde_json::from_str(json).map_err(|e| MixError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check budgets are usable
    pub fn validate(&self) -> MixResult<()> {
        if self.max_events_per_run == Some(0) {
            return Err(MixError::InvalidConfig(
                "max_events_per_run must be at least 1".into(),
            ));
        }
        if self.max_runs == Some(0) {
            return Err(MixError::InvalidConfig("max_runs must be at least 1".into()));
        }
        if let Some(seconds) = self.max_run_seconds {
            if !(seconds.is_finite() && seconds > 0.0) {
                return Err(MixError::InvalidConfig(format!(
                    "max_run_seconds must be finite and > 0, got {seconds}"
                )));
            }
        }
        Ok(())
    }

    pub fn with_start_run(mut self, run: u32) -> Self {
        self.start_run = RunNumber::new(run);
        self
    }

    pub fn with_start_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.start_timestamp = timestamp;
        self
    }

    pub fn with_start_event_id(mut self, id: u64) -> Self {
        self.start_event_id = EventId::new(id);
        self
    }

    pub fn with_max_events_per_run(mut self, events: u64) -> Self {
        self.max_events_per_run = Some(events);
        self
    }

    pub fn with_max_runs(mut self, runs: u32) -> Self {
        self.max_runs = Some(runs);
        self
    }

    pub fn with_max_run_seconds(mut self, seconds: f64) -> Self {
        self.max_run_seconds = Some(seconds);
        self
    }

    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
