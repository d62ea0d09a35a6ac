//! Synthetic physics-event generator
//!
//! Produces seeded streams shaped like real upstream data:
//! - A random number of triggers per event, within a range
//! - Trigger times spread after the first trigger
//! - Optional auxiliary truth payloads
//! - Optional read failure after a number of events
//!
//! Reopening a profile restarts the same sequence, so looping sources
//! replay identical data.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use evmix_core::{EventContext, MixError, MixResult, PhysicsEvent, Trigger, TruthPayload};
use evmix_source::{EventStream, StreamOpener};

/// Shape of a synthetic event stream
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticProfile {
    /// Events before the stream runs dry; `None` is endless
    pub events: Option<u64>,
    /// Triggers per event
    pub triggers: RangeInclusive<usize>,
    /// Latest trigger time, in seconds after the first trigger
    pub spread: f64,
    /// Attach a truth payload to every event
    pub with_truth: bool,
    /// Trigger payload size in bytes
    pub payload_size: usize,
    /// Fail the read after this many events
    pub fail_after: Option<u64>,
    pub seed: u64,
}

impl SyntheticProfile {
    /// One trigger per event, no truth
    pub fn single(events: u64, seed: u64) -> Self {
        SyntheticProfile {
            events: Some(events),
            triggers: 1..=1,
            spread: 0.0,
            with_truth: false,
            payload_size: 16,
            fail_after: None,
            seed,
        }
    }

    /// Several triggers per event, with truth
    pub fn bursty(events: u64, seed: u64) -> Self {
        SyntheticProfile {
            events: Some(events),
            triggers: 1..=4,
            spread: 0.05,
            with_truth: true,
            payload_size: 64,
            fail_after: None,
            seed,
        }
    }

    pub fn endless(mut self) -> Self {
        self.events = None;
        self
    }

    pub fn with_triggers(mut self, triggers: RangeInclusive<usize>) -> Self {
        self.triggers = triggers;
        self
    }

    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    pub fn with_truth(mut self, with_truth: bool) -> Self {
        self.with_truth = with_truth;
        self
    }

    pub fn failing_after(mut self, events: u64) -> Self {
        self.fail_after = Some(events);
        self
    }
}

/// Seeded stream following a `SyntheticProfile`
pub struct SyntheticStream {
    name: String,
    profile: SyntheticProfile,
    rng: StdRng,
    produced: u64,
}

impl SyntheticStream {
    pub fn new(name: impl Into<String>, profile: SyntheticProfile) -> Self {
        let rng = StdRng::seed_from_u64(profile.seed);
        SyntheticStream {
            name: name.into(),
            profile,
            rng,
            produced: 0,
        }
    }

    pub fn produced(&self) -> u64 {
        self.produced
    }

    fn generate(&mut self) -> PhysicsEvent {
        let count = self.rng.gen_range(self.profile.triggers.clone());
        let mut times: Vec<f64> = (0..count)
            .map(|i| {
                if i == 0 || self.profile.spread <= 0.0 {
                    0.0
                } else {
                    self.rng.gen_range(0.0..=self.profile.spread)
                }
            })
            .collect();
        times.sort_by(f64::total_cmp);

        let triggers = times
            .into_iter()
            .map(|time| Trigger::new(time, self.random_bytes(self.profile.payload_size)))
            .collect();

        let header = Bytes::from(self.produced.to_le_bytes().to_vec());
        let mut context = EventContext::new(self.produced, header);
        if self.profile.with_truth {
            let truth = self.random_bytes(self.profile.payload_size / 2);
            context = context.with_truth(TruthPayload::new(truth));
        }
        PhysicsEvent::new(context, triggers)
    }

    fn random_bytes(&mut self, len: usize) -> Bytes {
        let mut data = vec![0u8; len];
        self.rng.fill(&mut data[..]);
        Bytes::from(data)
    }
}

impl EventStream for SyntheticStream {
    fn read_next(&mut self) -> MixResult<Option<PhysicsEvent>> {
        if self.profile.fail_after == Some(self.produced) {
            return Err(MixError::Reader {
                source_name: self.name.clone(),
                reason: format!("injected failure after {} events", self.produced),
            });
        }
        if let Some(limit) = self.profile.events {
            if self.produced >= limit {
                return Ok(None);
            }
        }
        let event = self.generate();
        self.produced += 1;
        Ok(Some(event))
    }
}

/// Serves named synthetic profiles
#[derive(Clone, Debug, Default)]
pub struct SyntheticOpener {
    profiles: HashMap<String, SyntheticProfile>,
}

impl SyntheticOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, identifier: impl Into<String>, profile: SyntheticProfile) -> Self {
        self.profiles.insert(identifier.into(), profile);
        self
    }

    pub fn profile(&self, identifier: &str) -> Option<&SyntheticProfile> {
        self.profiles.get(identifier)
    }
}

impl StreamOpener for SyntheticOpener {
    fn open(&self, identifier: &str) -> MixResult<Box<dyn EventStream>> {
        let profile = self
            .profiles
            .get(identifier)
            .cloned()
            .ok_or_else(|| MixError::SourceUnavailable(identifier.to_string()))?;
        Ok(Box::new(SyntheticStream::new(identifier, profile)))
    }
}
