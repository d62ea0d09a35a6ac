//! Time primitives for the mixer
//!
//! Two notions of time are used:
//! - Simulated elapsed time: `f64` seconds, either since mixing began
//!   (session frame) or since the current run's origin (run frame)
//! - Absolute time: `Timestamp`, stamped onto records at emission

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Absolute timestamp - seconds and nanoseconds since the Unix epoch
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp {
    secs: i64,
    nanos: u32,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp { secs: 0, nanos: 0 };

    /// Create a timestamp; `nanos` beyond one second carry into `secs`
    pub fn new(secs: i64, nanos: u32) -> Self {
        Self::from_total_nanos(secs as i128 * NANOS_PER_SEC + nanos as i128)
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Timestamp {
            secs: since_epoch.as_secs() as i64,
            nanos: since_epoch.subsec_nanos(),
        }
    }

    #[inline]
    pub fn secs(self) -> i64 {
        self.secs
    }

    #[inline]
    pub fn subsec_nanos(self) -> u32 {
        self.nanos
    }

    /// Timestamp `delta` seconds after (or before, if negative) this one.
    /// Resolution is one nanosecond.
    pub fn offset_by_secs(self, delta: f64) -> Self {
        let delta_nanos = (delta * 1e9).round() as i128;
        Self::from_total_nanos(self.total_nanos() + delta_nanos)
    }

    #[inline]
    fn total_nanos(self) -> i128 {
        self.secs as i128 * NANOS_PER_SEC + self.nanos as i128
    }

    fn from_total_nanos(total: i128) -> Self {
        let secs = total.div_euclid(NANOS_PER_SEC);
        let nanos = total.rem_euclid(NANOS_PER_SEC) as u32;
        Timestamp {
            secs: secs.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
            nanos,
        }
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ts({}.{:09})", self.secs, self.nanos)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.secs, self.nanos)
    }
}
