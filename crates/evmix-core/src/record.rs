//! Output records
//!
//! A `Record` is one trigger together with the shared context of the
//! physics event it came from. It is built once and never edited; the
//! scheduler attaches sequencing metadata by wrapping it in an
//! `EmittedRecord`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{EventContext, EventId, RunNumber, Timestamp, Trigger, TruthPayload};

/// One trigger plus its shared event context
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Name of the source that produced this record
    source: Arc<str>,
    context: EventContext,
    trigger: Trigger,
}

impl Record {
    pub fn new(source: Arc<str>, context: EventContext, trigger: Trigger) -> Self {
        Record {
            source,
            context,
            trigger,
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn context(&self) -> &EventContext {
        &self.context
    }

    #[inline]
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    #[inline]
    pub fn truth(&self) -> Option<&TruthPayload> {
        self.context.truth()
    }
}

/// A record stamped with run number, event id and absolute time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmittedRecord {
    pub run: RunNumber,
    pub event_id: EventId,
    pub timestamp: Timestamp,
    /// Seconds since the origin of this run
    pub elapsed: f64,
    pub record: Record,
}

impl EmittedRecord {
    pub fn source(&self) -> &str {
        self.record.source()
    }
}
