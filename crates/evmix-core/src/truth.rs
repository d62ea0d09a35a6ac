//! Auxiliary truth payload handling
//!
//! A physics event may carry ground-truth simulation content alongside
//! its triggers. When an event is split into one record per trigger the
//! mode decides what happens to that payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MixError;

/// How truth content travels with split triggers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruthMode {
    /// Keep truth untouched; an event with more than one trigger is an error
    #[default]
    Keep,
    /// Copy truth into every record split from the event
    Duplicate,
    /// Strip truth before any record is built
    Prune,
}

impl TruthMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TruthMode::Keep => "keep",
            TruthMode::Duplicate => "duplicate",
            TruthMode::Prune => "prune",
        }
    }
}

impl FromStr for TruthMode {
    type Err = MixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(TruthMode::Keep),
            "duplicate" => Ok(TruthMode::Duplicate),
            "prune" => Ok(TruthMode::Prune),
            other => Err(MixError::InvalidTruthMode(other.to_string())),
        }
    }
}

impl fmt::Display for TruthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
