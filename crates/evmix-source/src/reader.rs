//! Upstream stream readers
//!
//! Concrete event formats live outside the mixer. A source only needs to
//! open a named stream and read physics events from it until it runs dry.

use std::collections::HashMap;
use std::sync::Arc;

use evmix_core::{MixError, MixResult, PhysicsEvent};

/// An open upstream event stream
pub trait EventStream {
    /// Next physics event, or `None` once the stream is drained
    fn read_next(&mut self) -> MixResult<Option<PhysicsEvent>>;
}

/// Opens upstream streams by identifier
pub trait StreamOpener {
    /// Open `identifier` from its start
    fn open(&self, identifier: &str) -> MixResult<Box<dyn EventStream>>;
}

/// Stream over a shared, in-memory list of events
pub struct MemoryStream {
    events: Arc<Vec<PhysicsEvent>>,
    position: usize,
}

impl MemoryStream {
    pub fn new(events: Arc<Vec<PhysicsEvent>>) -> Self {
        MemoryStream {
            events,
            position: 0,
        }
    }
}

impl EventStream for MemoryStream {
    fn read_next(&mut self) -> MixResult<Option<PhysicsEvent>> {
        let event = self.events.get(self.position).cloned();
        if event.is_some() {
            self.position += 1;
        }
        Ok(event)
    }
}

/// Opener serving named in-memory event lists
#[derive(Default)]
pub struct MemoryOpener {
    streams: HashMap<String, Arc<Vec<PhysicsEvent>>>,
}

impl MemoryOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `events` under `identifier`, replacing any previous list
    pub fn insert(&mut self, identifier: impl Into<String>, events: Vec<PhysicsEvent>) {
        self.streams.insert(identifier.into(), Arc::new(events));
    }

    pub fn with_stream(mut self, identifier: impl Into<String>, events: Vec<PhysicsEvent>) -> Self {
        self.insert(identifier, events);
        self
    }
}

impl StreamOpener for MemoryOpener {
    fn open(&self, identifier: &str) -> MixResult<Box<dyn EventStream>> {
        let events = self
            .streams
            .get(identifier)
            .ok_or_else(|| MixError::SourceUnavailable(identifier.to_string()))?;
        Ok(Box::new(MemoryStream::new(Arc::clone(events))))
    }
}
