//! Sequencing identifiers stamped onto emitted records
//!
//! Run numbers and event ids are rewritten by the scheduler at emission
//! time; upstream numbering is never carried through.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Run number - increases by exactly one between runs
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunNumber(pub u32);

impl RunNumber {
    #[inline]
    pub fn new(run: u32) -> Self {
        RunNumber(run)
    }

    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }

    /// The run that follows this one
    #[inline]
    pub fn next(self) -> Self {
        RunNumber(self.0.wrapping_add(1))
    }
}

impl fmt::Debug for RunNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Run({})", self.0)
    }
}

impl fmt::Display for RunNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output event identifier - strictly increasing across the whole session
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl EventId {
    pub const ZERO: EventId = EventId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        EventId(id)
    }

    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Return the current id and advance the counter by one
    #[inline]
    pub fn take_next(&mut self) -> EventId {
        let current = *self;
        self.0 = self.0.wrapping_add(1);
        current
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
