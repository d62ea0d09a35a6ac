//! Source cursor - turns one upstream stream into buffered records
//!
//! Each cursor owns its stream, its arrival clock and its truth policy.
//! Nothing else reads or moves the clock. Pulling one physics event
//! places one entry per trigger into the shared buffer:
//!
//! ```text
//! key_i = (next_arrival - origin) + (t_i - t_0)
//! ```
//!
//! The whole event arrives on the Poisson clock while the relative
//! timing of its triggers is kept. `origin` is the session time of the
//! current run's start, so keys land in the buffer's run frame.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use evmix_core::{MixError, MixResult, PhysicsEvent, PriorityBuffer, Record, TruthMode};

use crate::{ArrivalClock, EventStream, SourceConfig, StreamOpener};

/// Lifecycle of a source
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
    /// Upstream may still produce
    Active,
    /// Upstream drained, reopened on the next read
    ExhaustedLooping,
    /// Upstream drained for good
    ExhaustedNonLooping,
}

/// Result of pulling one physics event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullOutcome {
    /// The event was split into this many buffered records
    Inserted(usize),
    /// The event had no triggers; only the clock moved
    NoTriggers,
    /// The source will not produce again
    EndOfStream,
}

/// Per-source counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CursorStats {
    pub events_read: u64,
    pub empty_events: u64,
    pub records_inserted: u64,
    pub loops_completed: u64,
}

/// One upstream source feeding the priority buffer
pub struct SourceCursor {
    /// Source identifier, shared with every record it produces
    name: Arc<str>,
    opener: Arc<dyn StreamOpener>,
    stream: Box<dyn EventStream>,
    truth_mode: TruthMode,
    looping: bool,
    clock: ArrivalClock,
    state: CursorState,
    /// Records inserted since the stream was last (re)opened
    inserted_this_pass: u64,
    stats: CursorStats,
}

impl SourceCursor {
    /// Open a source with an entropy-seeded clock
    pub fn open(config: SourceConfig, opener: Arc<dyn StreamOpener>) -> MixResult<Self> {
        let clock = ArrivalClock::new(config.spec.rate)?;
        Self::with_clock(config, opener, clock)
    }

    /// Open a source with a reproducible clock
    pub fn open_seeded(
        config: SourceConfig,
        opener: Arc<dyn StreamOpener>,
        seed: u64,
    ) -> MixResult<Self> {
        let clock = ArrivalClock::with_seed(config.spec.rate, seed)?;
        Self::with_clock(config, opener, clock)
    }

    fn with_clock(
        config: SourceConfig,
        opener: Arc<dyn StreamOpener>,
        clock: ArrivalClock,
    ) -> MixResult<Self> {
        let stream = opener.open(&config.spec.identifier)?;
        debug!(
            source = %config.spec.identifier,
            rate = config.spec.rate,
            truth_mode = %config.truth_mode,
            looping = config.looping,
            "source opened"
        );
        Ok(SourceCursor {
            name: Arc::from(config.spec.identifier.as_str()),
            opener,
            stream,
            truth_mode: config.truth_mode,
            looping: config.looping,
            clock,
            state: CursorState::Active,
            inserted_this_pass: 0,
            stats: CursorStats::default(),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.clock.rate()
    }

    #[inline]
    pub fn truth_mode(&self) -> TruthMode {
        self.truth_mode
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Session time at which this source's next physics event arrives
    #[inline]
    pub fn next_arrival(&self) -> f64 {
        self.clock.next_arrival()
    }

    #[inline]
    pub fn state(&self) -> CursorState {
        self.state
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::ExhaustedNonLooping
    }

    pub fn stats(&self) -> &CursorStats {
        &self.stats
    }

    /// Read one physics event and buffer its triggers.
    ///
    /// A source that cannot produce any more still advances its clock
    /// and reports `EndOfStream`. An event with several triggers while
    /// keeping truth fails with `MultipleTriggers` and buffers nothing.
    pub fn pull(
        &mut self,
        buffer: &mut PriorityBuffer<Record>,
        origin: f64,
    ) -> MixResult<PullOutcome> {
        let Some(event) = self.read_upstream()? else {
            if self.state != CursorState::ExhaustedNonLooping {
                debug!(source = %self.name, stats = ?self.stats, "source exhausted");
            }
            self.state = CursorState::ExhaustedNonLooping;
            self.clock.advance();
            return Ok(PullOutcome::EndOfStream);
        };
        self.stats.events_read += 1;

        if event.trigger_count() == 0 {
            self.stats.empty_events += 1;
            self.clock.advance();
            return Ok(PullOutcome::NoTriggers);
        }

        let count = self.distribute(event, buffer, origin)?;
        self.clock.advance();
        Ok(PullOutcome::Inserted(count))
    }

    /// Pull until this source's next arrival is no earlier than the head
    /// of the buffer, or until the source is exhausted. Once that holds
    /// the source cannot slip anything in front of the next pop. An empty
    /// buffer always costs at least one pull.
    pub fn refill(&mut self, buffer: &mut PriorityBuffer<Record>, origin: f64) -> MixResult<()> {
        while !self.is_exhausted() {
            if let Some(head) = buffer.min_key() {
                if self.clock.next_arrival() - origin >= head {
                    break;
                }
            }
            if self.pull(buffer, origin)? == PullOutcome::EndOfStream {
                break;
            }
        }
        Ok(())
    }

    /// Next upstream event, reopening the stream once if looping
    fn read_upstream(&mut self) -> MixResult<Option<PhysicsEvent>> {
        if self.state == CursorState::ExhaustedNonLooping {
            return Ok(None);
        }
        if let Some(event) = self.stream.read_next()? {
            return Ok(Some(event));
        }
        if !self.looping {
            return Ok(None);
        }

        self.state = CursorState::ExhaustedLooping;
        if self.inserted_this_pass == 0 {
            // Looping a pass that produced nothing would spin forever.
            warn!(source = %self.name, "looping source produced no triggers in a full pass");
            return Ok(None);
        }

        debug!(source = %self.name, loops = self.stats.loops_completed + 1, "reopening source");
        self.stream = self.opener.open(&self.name)?;
        self.stats.loops_completed += 1;
        self.inserted_this_pass = 0;
        self.state = CursorState::Active;
        self.stream.read_next()
    }

    /// Split `event` into records and insert them
    fn distribute(
        &mut self,
        event: PhysicsEvent,
        buffer: &mut PriorityBuffer<Record>,
        origin: f64,
    ) -> MixResult<usize> {
        let count = event.trigger_count();
        match self.truth_mode {
            TruthMode::Keep if count > 1 => {
                return Err(MixError::MultipleTriggers {
                    source_name: self.name.to_string(),
                    count,
                });
            }
            _ => {}
        }

        let (mut context, mut triggers) = event.into_parts();
        if self.truth_mode == TruthMode::Prune {
            context.strip_truth();
        }
        // Keys are offsets from the earliest trigger, which lands on the arrival.
        triggers.sort_by(|a, b| a.time.total_cmp(&b.time));

        let arrival = self.clock.next_arrival() - origin;
        let t0 = triggers[0].time;
        let mut remaining = triggers.into_iter().peekable();
        while let Some(trigger) = remaining.next() {
            let key = arrival + (trigger.time - t0);
            // Every record but the last gets its own copy of the context;
            // the last one takes the original.
            let record_context = if remaining.peek().is_some() {
                context.clone()
            } else {
                std::mem::take(&mut context)
            };
            trace!(source = %self.name, key, "buffering trigger");
            buffer.insert(key, Record::new(Arc::clone(&self.name), record_context, trigger));
        }

        self.stats.records_inserted += count as u64;
        self.inserted_this_pass += count as u64;
        Ok(count)
    }
}

impl std::fmt::Debug for SourceCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceCursor")
            .field("name", &self.name)
            .field("rate", &self.clock.rate())
            .field("truth_mode", &self.truth_mode)
            .field("looping", &self.looping)
            .field("next_arrival", &self.clock.next_arrival())
            .field("state", &self.state)
            .finish()
    }
}
