//! Source identification
//!
//! Sources are named on the command line as `<identifier>=<rate>`, where
//! the rate is the mean number of physics events per simulated second.

use std::fmt;
use std::str::FromStr;

use evmix_core::{MixError, MixResult, TruthMode};

/// Parsed `<identifier>=<rate>` pair
#[derive(Clone, Debug, PartialEq)]
pub struct SourceSpec {
    pub identifier: String,
    pub rate: f64,
}

impl SourceSpec {
    /// Create a validated spec
    pub fn new(identifier: impl Into<String>, rate: f64) -> MixResult<Self> {
        let identifier = identifier.into();
        validate_rate(&identifier, rate)?;
        Ok(SourceSpec { identifier, rate })
    }
}

impl FromStr for SourceSpec {
    type Err = MixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Split on the last '=' so identifiers may contain one (e.g. URLs).
        let (identifier, rate) = s
            .rsplit_once('=')
            .ok_or_else(|| MixError::InvalidSourceSpec(s.to_string()))?;
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(MixError::InvalidSourceSpec(s.to_string()));
        }
        let rate: f64 = rate
            .trim()
            .parse()
            .map_err(|_| MixError::InvalidSourceSpec(s.to_string()))?;
        SourceSpec::new(identifier, rate)
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.identifier, self.rate)
    }
}

/// Full per-source configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SourceConfig {
    pub spec: SourceSpec,
    pub truth_mode: TruthMode,
    /// Reopen the upstream from its start when it runs dry
    pub looping: bool,
}

impl SourceConfig {
    pub fn new(spec: SourceSpec) -> Self {
        SourceConfig {
            spec,
            truth_mode: TruthMode::default(),
            looping: false,
        }
    }

    pub fn with_truth_mode(mut self, truth_mode: TruthMode) -> Self {
        self.truth_mode = truth_mode;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

pub(crate) fn validate_rate(identifier: &str, rate: f64) -> MixResult<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(MixError::InvalidRate {
            source_name: identifier.to_string(),
            rate,
        })
    }
}
