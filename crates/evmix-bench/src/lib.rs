//! Shared fixtures for the evmix benchmarks

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use evmix_core::MixResult;
use evmix_sched::{MixConfig, Scheduler};
use evmix_source::{SourceConfig, SourceSpec};
use evmix_test::{MixHarness, SyntheticProfile};

/// Seeded keys in `[0, span)`, with roughly one in ten repeated
pub fn random_keys(count: usize, span: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys = Vec::with_capacity(count);
    for _ in 0..count {
        let key = match keys.last() {
            Some(&last) if rng.gen_bool(0.1) => last,
            _ => rng.gen_range(0.0..span),
        };
        keys.push(key);
    }
    keys
}

/// Background plus bursty signal, `events` records in a single run
pub fn background_and_signal(events: u64, seed: u64) -> MixResult<Scheduler> {
    let background = SourceConfig::new(SourceSpec::new("background", 200.0)?).with_looping(true);
    let signal = SourceConfig::new(SourceSpec::new("signal", 5.0)?)
        .with_truth_mode(evmix_core::TruthMode::Duplicate)
        .with_looping(true);

    MixHarness::new(
        MixConfig::default()
            .with_max_events_per_run(events)
            .with_max_runs(1)
            .with_seed(seed),
    )
    .with_source(background, SyntheticProfile::single(1_000, seed))
    .with_source(signal, SyntheticProfile::bursty(1_000, seed ^ 0x5eed))
    .scheduler()
}
