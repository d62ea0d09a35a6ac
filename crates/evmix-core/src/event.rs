//! Upstream physics events
//!
//! A physics event is one simulated interaction. It owns a shared context
//! (everything that is not trigger readout) and zero or more triggers,
//! each with its own event-local timestamp.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Ground-truth simulation content attached to a physics event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TruthPayload(pub Bytes);

impl TruthPayload {
    pub fn new(data: impl Into<Bytes>) -> Self {
        TruthPayload(data.into())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Shared, non-trigger part of a physics event
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventContext {
    /// Event number assigned by the upstream producer
    pub upstream_id: u64,
    /// Opaque header fields
    pub header: Bytes,
    /// Auxiliary truth payload, if the producer kept one
    truth: Option<TruthPayload>,
}

impl EventContext {
    pub fn new(upstream_id: u64, header: impl Into<Bytes>) -> Self {
        EventContext {
            upstream_id,
            header: header.into(),
            truth: None,
        }
    }

    pub fn with_truth(mut self, truth: TruthPayload) -> Self {
        self.truth = Some(truth);
        self
    }

    #[inline]
    pub fn truth(&self) -> Option<&TruthPayload> {
        self.truth.as_ref()
    }

    #[inline]
    pub fn has_truth(&self) -> bool {
        self.truth.is_some()
    }

    /// Remove the truth payload, returning it
    pub fn strip_truth(&mut self) -> Option<TruthPayload> {
        self.truth.take()
    }
}

/// One detector readout within a physics event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Event-local trigger time in seconds
    pub time: f64,
    /// Readout payload
    pub payload: Bytes,
}

impl Trigger {
    pub fn new(time: f64, payload: impl Into<Bytes>) -> Self {
        Trigger {
            time,
            payload: payload.into(),
        }
    }
}

/// A physics event as read from an upstream stream
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PhysicsEvent {
    context: EventContext,
    triggers: Vec<Trigger>,
}

impl PhysicsEvent {
    pub fn new(context: EventContext, triggers: Vec<Trigger>) -> Self {
        PhysicsEvent { context, triggers }
    }

    #[inline]
    pub fn context(&self) -> &EventContext {
        &self.context
    }

    #[inline]
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Event-local time of trigger `index`
    #[inline]
    pub fn trigger_time(&self, index: usize) -> Option<f64> {
        self.triggers.get(index).map(|t| t.time)
    }

    /// Remove the truth payload from the shared context
    pub fn strip_truth(&mut self) -> Option<TruthPayload> {
        self.context.strip_truth()
    }

    /// Split into shared context and triggers.
    ///
    /// Triggers are moved out: once a payload belongs to a record the
    /// event no longer exists to be queried for it.
    pub fn into_parts(self) -> (EventContext, Vec<Trigger>) {
        (self.context, self.triggers)
    }
}
