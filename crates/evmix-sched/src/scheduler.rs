//! Mixing scheduler - the session loop
//!
//! Per run:
//! 1. Refill every source, then rebase the buffer so the run's first
//!    record has elapsed time zero (the first run keeps origin zero)
//! 2. Refill every source until a full pass adds nothing
//! 3. Pop the earliest entry; past the time budget the run ends
//! 4. Stamp run number, event id and absolute time; emit
//! 5. Repeat from 2 until the event or time budget is spent
//! 6. Move to the next run unless the run budget is spent
//!
//! The session ends early when every source is exhausted and the buffer
//! drains. Any source error ends the session and is returned unchanged.

use std::iter::FusedIterator;
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use evmix_core::{
    EmittedRecord, EventId, MixError, MixResult, PriorityBuffer, Record, RunNumber, Timestamp,
};
use evmix_source::{SourceConfig, SourceCursor, StreamOpener};

use crate::{MixConfig, RealTimePacer, Sink, StopHandle};

/// Bookkeeping for the run in progress
#[derive(Clone, Debug, PartialEq)]
pub struct RunState {
    pub run: RunNumber,
    /// Absolute time of elapsed zero in this run
    pub start_timestamp: Timestamp,
    /// Session seconds at which this run's elapsed time is zero
    pub origin: f64,
    /// Records emitted in this run
    pub emitted: u64,
}

/// Session counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MixSummary {
    pub runs_started: u32,
    pub runs_completed: u32,
    pub records_emitted: u64,
    /// Records popped past the run time budget and dropped
    pub records_discarded: u64,
}

/// Why a run stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunEnd {
    EventBudget,
    TimeBudget,
    Drained,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Waiting to start the next run
    BetweenRuns,
    Running,
    Finished,
}

enum Step {
    Emit(EmittedRecord),
    RunEnded(RunEnd),
}

/// Merges sources into one time-ordered, stamped record stream
pub struct Scheduler {
    config: MixConfig,
    sources: Vec<SourceCursor>,
    buffer: PriorityBuffer<Record>,
    phase: Phase,
    run: RunState,
    /// Next event id to hand out; never reset between runs
    event_ids: EventId,
    summary: MixSummary,
    pacer: Option<RealTimePacer>,
    stop: StopHandle,
}

impl Scheduler {
    /// Create a scheduler over already-open sources
    pub fn new(config: MixConfig, sources: Vec<SourceCursor>) -> MixResult<Self> {
        config.validate()?;
        if sources.is_empty() {
            return Err(MixError::InvalidConfig("at least one source is required".into()));
        }

        let run = RunState {
            run: config.start_run,
            start_timestamp: config.start_timestamp,
            origin: 0.0,
            emitted: 0,
        };
        Ok(Scheduler {
            event_ids: config.start_event_id,
            config,
            sources,
            buffer: PriorityBuffer::new(),
            phase: Phase::BetweenRuns,
            run,
            summary: MixSummary::default(),
            pacer: None,
            stop: StopHandle::new(),
        })
    }

    /// Open every source through `opener` and create a scheduler.
    ///
    /// With a configured seed, source `i` gets clock seed `seed + i`.
    pub fn open(
        config: MixConfig,
        sources: Vec<SourceConfig>,
        opener: Arc<dyn StreamOpener>,
    ) -> MixResult<Self> {
        let cursors = sources
            .into_iter()
            .enumerate()
            .map(|(i, source)| match config.seed {
                Some(seed) => {
                    SourceCursor::open_seeded(source, Arc::clone(&opener), seed.wrapping_add(i as u64))
                }
                None => SourceCursor::open(source, Arc::clone(&opener)),
            })
            .collect::<MixResult<Vec<_>>>()?;
        Self::new(config, cursors)
    }

    pub fn config(&self) -> &MixConfig {
        &self.config
    }

    pub fn sources(&self) -> &[SourceCursor] {
        &self.sources
    }

    /// Entries waiting in the priority buffer
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn summary(&self) -> &MixSummary {
        &self.summary
    }

    /// The run in progress (or the last one, once finished)
    pub fn current_run(&self) -> &RunState {
        &self.run
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Handle that ends the session before its next record
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Next stamped record, or `None` once the session is over.
    ///
    /// After an error or the end of the session every further call
    /// returns `Ok(None)`.
    pub fn next_record(&mut self) -> MixResult<Option<EmittedRecord>> {
        loop {
            if self.phase == Phase::Finished {
                return Ok(None);
            }

            if self.stop.is_stopped() {
                warn!(run = %self.run.run, "stop requested");
                if self.phase == Phase::Running {
                    self.end_run(RunEnd::Stopped);
                }
                self.finish();
                return Ok(None);
            }

            if self.phase == Phase::BetweenRuns {
                match self.start_run() {
                    Ok(true) => {}
                    Ok(false) => {
                        self.finish();
                        return Ok(None);
                    }
                    Err(e) => return Err(self.abort(e)),
                }
            }

            match self.step() {
                Ok(Step::Emit(record)) => return Ok(Some(record)),
                Ok(Step::RunEnded(RunEnd::Drained)) => {
                    self.end_run(RunEnd::Drained);
                    self.finish();
                    return Ok(None);
                }
                Ok(Step::RunEnded(reason)) => self.end_run(reason),
                Err(e) => return Err(self.abort(e)),
            }
        }
    }

    /// Drive the whole session into `sink`
    pub fn run<S: Sink>(&mut self, mut sink: S) -> MixResult<MixSummary> {
        loop {
            match self.next_record() {
                Ok(Some(record)) => sink.emit(record)?,
                Ok(None) => break,
                Err(e) => {
                    // The source error is what the caller needs to see.
                    let _ = sink.finish();
                    return Err(e);
                }
            }
        }
        sink.finish()?;
        Ok(self.summary.clone())
    }

    /// Begin the next run; false once the run budget is spent or
    /// nothing is left to mix.
    ///
    /// Sources are refilled before the rebase: the new origin is the
    /// earliest pending time across all sources.
    fn start_run(&mut self) -> MixResult<bool> {
        if let Some(max_runs) = self.config.max_runs {
            if self.summary.runs_started >= max_runs {
                return Ok(false);
            }
        }

        self.refill_all()?;
        let Some(head) = self.buffer.min_key() else {
            debug!("all sources exhausted and buffer drained");
            return Ok(false);
        };

        if self.summary.runs_started > 0 {
            self.run.run = self.run.run.next();
            self.buffer.shift_all_keys(-head);
            self.run.origin += head;
            self.run.start_timestamp = self.run.start_timestamp.offset_by_secs(head);
        }
        self.run.emitted = 0;

        if self.config.realtime && self.pacer.is_none() {
            self.pacer = Some(RealTimePacer::new());
        }

        self.summary.runs_started += 1;
        self.phase = Phase::Running;
        info!(
            run = %self.run.run,
            start = %self.run.start_timestamp,
            origin = self.run.origin,
            buffered = self.buffer.len(),
            "run started"
        );
        Ok(true)
    }

    fn end_run(&mut self, reason: RunEnd) {
        self.summary.runs_completed += 1;
        self.phase = Phase::BetweenRuns;
        info!(
            run = %self.run.run,
            emitted = self.run.emitted,
            reason = ?reason,
            "run ended"
        );
    }

    fn abort(&mut self, error: MixError) -> MixError {
        warn!(run = %self.run.run, error = %error, "mixing aborted");
        self.phase = Phase::Finished;
        error
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        info!(
            runs = self.summary.runs_completed,
            emitted = self.summary.records_emitted,
            discarded = self.summary.records_discarded,
            "mixing session finished"
        );
    }

    /// Refill every source until a whole pass leaves the buffer unchanged.
    ///
    /// One source's refill can lower the buffer head, which another source
    /// may then need to catch up to; stopping before the fixed point could
    /// pop an entry ahead of one not yet read.
    fn refill_all(&mut self) -> MixResult<()> {
        let origin = self.run.origin;
        let mut passes = 0u32;
        loop {
            let before = self.buffer.len();
            for source in &mut self.sources {
                source.refill(&mut self.buffer, origin)?;
            }
            passes += 1;
            if self.buffer.len() == before {
                break;
            }
        }
        trace!(passes, buffered = self.buffer.len(), "refill converged");
        Ok(())
    }

    /// Produce at most one record of the current run
    fn step(&mut self) -> MixResult<Step> {
        self.refill_all()?;
        if self.buffer.is_empty() {
            debug!("all sources exhausted and buffer drained");
            return Ok(Step::RunEnded(RunEnd::Drained));
        }
        let entry = self.buffer.pop()?;
        let elapsed = entry.key;

        if let Some(limit) = self.config.max_run_seconds {
            if elapsed > limit {
                self.summary.records_discarded += 1;
                warn!(run = %self.run.run, elapsed, limit, "record past time budget discarded");
                return Ok(Step::RunEnded(RunEnd::TimeBudget));
            }
        }

        if let Some(pacer) = self.pacer.as_ref() {
            pacer.pace(self.run.origin + elapsed);
        }

        let record = EmittedRecord {
            run: self.run.run,
            event_id: self.event_ids.take_next(),
            timestamp: self.run.start_timestamp.offset_by_secs(elapsed),
            elapsed,
            record: entry.value,
        };
        self.run.emitted += 1;
        self.summary.records_emitted += 1;
        trace!(
            run = %record.run,
            event_id = %record.event_id,
            elapsed,
            source = record.source(),
            "record emitted"
        );

        if let Some(max_events) = self.config.max_events_per_run {
            if self.run.emitted >= max_events {
                self.end_run(RunEnd::EventBudget);
            }
        }
        Ok(Step::Emit(record))
    }
}

impl Iterator for Scheduler {
    type Item = MixResult<EmittedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl FusedIterator for Scheduler {}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("phase", &self.phase)
            .field("run", &self.run)
            .field("sources", &self.sources)
            .field("buffered", &self.buffer.len())
            .field("summary", &self.summary)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySink;
    use evmix_core::{EventContext, PhysicsEvent, Trigger, TruthMode, TruthPayload};
    use evmix_source::{MemoryOpener, SourceSpec};

    fn singles(count: u64) -> Vec<PhysicsEvent> {
        (0..count)
            .map(|id| {
                PhysicsEvent::new(
                    EventContext::new(id, &b"h"[..]).with_truth(TruthPayload::new(&b"mc"[..])),
                    vec![Trigger::new(0.0, &b"t"[..])],
                )
            })
            .collect()
    }

    fn bursts(count: u64, offsets: &'static [f64]) -> Vec<PhysicsEvent> {
        (0..count)
            .map(|id| {
                let triggers = offsets.iter().map(|t| Trigger::new(*t, &b"t"[..])).collect();
                PhysicsEvent::new(
                    EventContext::new(id, &b"h"[..]).with_truth(TruthPayload::new(&b"mc"[..])),
                    triggers,
                )
            })
            .collect()
    }

    fn source(name: &str, rate: f64) -> SourceConfig {
        SourceConfig::new(SourceSpec::new(name, rate).unwrap())
    }

    fn two_sources(a: Vec<PhysicsEvent>, b: Vec<PhysicsEvent>) -> Arc<MemoryOpener> {
        Arc::new(MemoryOpener::new().with_stream("a", a).with_stream("b", b))
    }

    #[test]
    fn test_rejects_empty_source_list() {
        let err = Scheduler::new(MixConfig::default(), Vec::new()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let opener = two_sources(singles(1), singles(1));
        let config = MixConfig::default().with_max_runs(0);
        let err = Scheduler::open(config, vec![source("a", 1.0)], opener).unwrap_err();
        assert!(matches!(err, MixError::InvalidConfig(_)));
    }

    #[test]
    fn test_two_sources_single_run_five_events() {
        let opener = two_sources(singles(50), singles(50));
        let config = MixConfig::default()
            .with_start_run(17)
            .with_start_event_id(1000)
            .with_max_runs(1)
            .with_max_events_per_run(5)
            .with_seed(3);
        let scheduler =
            Scheduler::open(config, vec![source("a", 1.0), source("b", 2.0)], opener).unwrap();

        let records: Vec<_> = scheduler.map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 5);
        for pair in records.windows(2) {
            assert!(pair[0].elapsed < pair[1].elapsed);
        }
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.run, RunNumber::new(17));
            assert_eq!(record.event_id, EventId::new(1000 + i as u64));
        }
    }

    #[test]
    fn test_timestamps_follow_elapsed() {
        let opener = two_sources(singles(20), singles(20));
        let start = Timestamp::new(1_600_000_000, 0);
        let config = MixConfig::default()
            .with_start_timestamp(start)
            .with_max_runs(1)
            .with_seed(5);
        let mut scheduler =
            Scheduler::open(config, vec![source("a", 3.0), source("b", 3.0)], opener).unwrap();

        while let Some(record) = scheduler.next_record().unwrap() {
            let expected = start.offset_by_secs(record.elapsed);
            assert_eq!(record.timestamp, expected);
        }
        assert_eq!(scheduler.summary().records_emitted, 40);
    }

    #[test]
    fn test_global_order_with_bursts() {
        let opener = two_sources(
            bursts(200, &[0.0, 0.01, 0.02]),
            bursts(200, &[0.0, 0.3]),
        );
        let config = MixConfig::default()
            .with_max_events_per_run(97)
            .with_seed(11);
        let sources = vec![
            source("a", 10.0).with_truth_mode(TruthMode::Duplicate),
            source("b", 4.0).with_truth_mode(TruthMode::Prune),
        ];
        let scheduler = Scheduler::open(config, sources, opener).unwrap();

        let records: Vec<_> = scheduler.map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 200 * 3 + 200 * 2);
        for pair in records.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp, "{:?} then {:?}", pair[0], pair[1]);
            assert_eq!(pair[1].event_id.value(), pair[0].event_id.value() + 1);
        }
        for record in &records {
            match record.source() {
                "a" => assert!(record.record.truth().is_some()),
                _ => assert!(record.record.truth().is_none()),
            }
        }
    }

    #[test]
    fn test_event_budget_rolls_runs() {
        let opener = two_sources(singles(30), singles(30));
        let config = MixConfig::default()
            .with_start_run(1)
            .with_max_events_per_run(4)
            .with_max_runs(3)
            .with_seed(1);
        let mut scheduler =
            Scheduler::open(config, vec![source("a", 1.0), source("b", 1.0)], opener).unwrap();

        let mut sink = MemorySink::new();
        let summary = scheduler.run(&mut sink).unwrap();

        let runs: Vec<u32> = sink.records().iter().map(|r| r.run.value()).collect();
        assert_eq!(runs, vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);
        let ids: Vec<u64> = sink.records().iter().map(|r| r.event_id.value()).collect();
        assert_eq!(ids, (0..12).collect::<Vec<_>>());
        assert_eq!(summary.runs_started, 3);
        assert_eq!(summary.runs_completed, 3);
        assert!(sink.is_finished());
        assert!(scheduler.is_finished());
    }

    #[test]
    fn test_later_runs_are_rebased() {
        let opener = two_sources(singles(30), singles(30));
        let config = MixConfig::default()
            .with_max_events_per_run(5)
            .with_max_runs(2)
            .with_seed(8);
        let scheduler =
            Scheduler::open(config, vec![source("a", 2.0), source("b", 2.0)], opener).unwrap();

        let records: Vec<_> = scheduler.map(|r| r.unwrap()).collect();

        let second_run: Vec<_> = records.iter().filter(|r| r.run == RunNumber::new(2)).collect();
        assert_eq!(second_run.len(), 5);
        assert_eq!(second_run[0].elapsed, 0.0);
        assert!(second_run.iter().all(|r| r.elapsed >= 0.0));
        // Absolute time stays continuous across the rebase.
        assert!(records[4].timestamp <= records[5].timestamp);
    }

    #[test]
    fn test_every_run_emits_under_time_budget() {
        let opener = Arc::new(MemoryOpener::new().with_stream("bg", singles(25)));
        let config = MixConfig::default()
            .with_start_run(100)
            .with_max_run_seconds(0.5)
            .with_max_runs(5)
            .with_seed(31);
        let mut scheduler =
            Scheduler::open(config, vec![source("bg", 40.0).with_looping(true)], opener).unwrap();

        let mut sink = MemorySink::new();
        let summary = scheduler.run(&mut sink).unwrap();

        for run in 100..=104 {
            let in_run: Vec<_> = sink.records().iter().filter(|r| r.run.value() == run).collect();
            assert!(!in_run.is_empty(), "run {} emitted nothing", run);
            assert!(in_run.iter().all(|r| (0.0..=0.5).contains(&r.elapsed)));
            if run > 100 {
                assert_eq!(in_run[0].elapsed, 0.0);
            }
        }
        assert_eq!(summary.runs_started, 5);
        assert_eq!(summary.records_discarded, 5);
    }

    #[test]
    fn test_time_budget_discards_and_ends_run() {
        let opener = two_sources(singles(200), singles(200));
        let config = MixConfig::default()
            .with_max_run_seconds(2.0)
            .with_max_runs(3)
            .with_seed(21);
        let mut scheduler =
            Scheduler::open(config, vec![source("a", 5.0), source("b", 5.0)], opener).unwrap();

        let mut sink = MemorySink::new();
        let summary = scheduler.run(&mut sink).unwrap();

        assert!(sink.records().iter().all(|r| r.elapsed <= 2.0));
        assert_eq!(summary.runs_completed, 3);
        assert_eq!(summary.records_discarded, 3);
        let last_run = sink.records().last().unwrap().run;
        assert_eq!(last_run, RunNumber::new(3));
    }

    #[test]
    fn test_drained_sources_end_session() {
        let opener = two_sources(singles(3), bursts(2, &[0.0, 0.1]));
        let sources = vec![
            source("a", 1.0),
            source("b", 1.0).with_truth_mode(TruthMode::Duplicate),
        ];
        let mut scheduler =
            Scheduler::open(MixConfig::default().with_seed(2), sources, opener).unwrap();

        let mut count = 0;
        while scheduler.next_record().unwrap().is_some() {
            count += 1;
        }

        assert_eq!(count, 3 + 2 * 2);
        assert!(scheduler.is_finished());
        assert!(scheduler.sources().iter().all(|s| s.is_exhausted()));
        assert!(scheduler.next_record().unwrap().is_none());
        assert_eq!(scheduler.summary().runs_started, 1);
        assert_eq!(scheduler.summary().runs_completed, 1);
    }

    #[test]
    fn test_drain_at_run_boundary_starts_no_run() {
        let opener = two_sources(singles(3), singles(2));
        let config = MixConfig::default().with_max_events_per_run(5).with_seed(2);
        let mut scheduler =
            Scheduler::open(config, vec![source("a", 1.0), source("b", 1.0)], opener).unwrap();

        for _ in 0..5 {
            assert!(scheduler.next_record().unwrap().is_some());
        }
        assert!(scheduler.next_record().unwrap().is_none());

        assert_eq!(scheduler.summary().runs_started, 1);
        assert_eq!(scheduler.summary().runs_completed, 1);
        assert_eq!(scheduler.current_run().run, RunNumber::new(1));
    }

    #[test]
    fn test_stop_between_runs_starts_no_run() {
        let opener = two_sources(singles(10), singles(10));
        let sources = vec![source("a", 1.0).with_looping(true), source("b", 1.0).with_looping(true)];
        let config = MixConfig::default().with_max_events_per_run(3).with_seed(9);
        let mut scheduler = Scheduler::open(config, sources, opener).unwrap();

        for _ in 0..3 {
            assert!(scheduler.next_record().unwrap().is_some());
        }
        scheduler.stop_handle().stop();

        assert!(scheduler.next_record().unwrap().is_none());
        assert_eq!(scheduler.summary().runs_started, 1);
        assert_eq!(scheduler.summary().runs_completed, 1);
    }

    #[test]
    fn test_realtime_paces_session_time_across_runs() {
        let opener = Arc::new(MemoryOpener::new().with_stream("bg", singles(50)));
        let config = MixConfig::default()
            .with_max_events_per_run(20)
            .with_max_runs(2)
            .with_realtime(true)
            .with_seed(13);
        let started = std::time::Instant::now();
        let mut scheduler =
            Scheduler::open(config, vec![source("bg", 400.0).with_looping(true)], opener).unwrap();

        let mut last = None;
        while let Some(record) = scheduler.next_record().unwrap() {
            last = Some(record);
        }
        let last = last.unwrap();

        assert_eq!(last.run, RunNumber::new(2));
        let origin = scheduler.current_run().origin;
        assert!(origin > 0.0);
        let session_time = origin + last.elapsed;
        assert!(started.elapsed().as_secs_f64() + 1e-6 >= session_time);
    }

    #[test]
    fn test_exhausted_source_does_not_stop_others() {
        let opener = two_sources(singles(2), singles(3));
        let sources = vec![source("a", 5.0), source("b", 1.0).with_looping(true)];
        let config = MixConfig::default().with_max_events_per_run(40).with_max_runs(1).with_seed(4);
        let scheduler = Scheduler::open(config, sources, opener).unwrap();

        let records: Vec<_> = scheduler.map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 40);
        assert_eq!(records.iter().filter(|r| r.source() == "a").count(), 2);
    }

    #[test]
    fn test_multiple_triggers_aborts_session() {
        let opener = two_sources(singles(100), bursts(5, &[0.0, 0.5]));
        let sources = vec![source("a", 1.0), source("b", 1.0)];
        let mut scheduler =
            Scheduler::open(MixConfig::default().with_seed(6), sources, opener).unwrap();

        let mut saw_error = false;
        loop {
            match scheduler.next_record() {
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(e) => {
                    assert!(matches!(e, MixError::MultipleTriggers { count: 2, .. }));
                    saw_error = true;
                }
            }
        }

        assert!(saw_error);
        assert!(scheduler.is_finished());
        assert!(scheduler.next().is_none());
    }

    #[test]
    fn test_run_surfaces_error_to_caller() {
        let opener = two_sources(singles(10), bursts(1, &[0.0, 0.5]));
        let mut scheduler = Scheduler::open(
            MixConfig::default().with_seed(6),
            vec![source("a", 1.0), source("b", 1.0)],
            opener,
        )
        .unwrap();

        let mut sink = MemorySink::new();
        let err = scheduler.run(&mut sink).unwrap_err();
        assert!(matches!(err, MixError::MultipleTriggers { .. }));
        assert!(sink.is_finished());
    }

    #[test]
    fn test_stop_handle_ends_session() {
        let opener = two_sources(singles(10), singles(10));
        let sources = vec![source("a", 1.0).with_looping(true), source("b", 1.0).with_looping(true)];
        let mut scheduler =
            Scheduler::open(MixConfig::default().with_seed(9), sources, opener).unwrap();
        let stop = scheduler.stop_handle();

        for _ in 0..3 {
            assert!(scheduler.next_record().unwrap().is_some());
        }
        stop.stop();

        assert!(scheduler.next_record().unwrap().is_none());
        assert!(scheduler.is_finished());
        assert_eq!(scheduler.summary().records_emitted, 3);
    }

    #[test]
    fn test_seeded_sessions_are_reproducible() {
        let build = || {
            let opener = two_sources(singles(30), singles(30));
            let config = MixConfig::default().with_seed(77);
            Scheduler::open(config, vec![source("a", 1.0), source("b", 2.5)], opener).unwrap()
        };

        let first: Vec<_> = build().map(|r| r.unwrap()).collect();
        let second: Vec<_> = build().map(|r| r.unwrap()).collect();

        assert_eq!(first, second);
    }
}
