//! evmix Demo Application
//!
//! Mixes synthetic sources into one time-ordered stream and writes each
//! run to `<prefix>_<run>.jsonl`. Sources are given as `name=rate`;
//! names starting with `sig` produce bursty events with truth payloads,
//! everything else produces single-trigger background.
//!
//! Logging follows `RUST_LOG` (default `info`).

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use evmix_core::{Timestamp, TruthMode};
use evmix_sched::{MixConfig, RotatingFileSink, Scheduler};
use evmix_source::{SourceConfig, SourceSpec};
use evmix_test::{SyntheticOpener, SyntheticProfile};

#[derive(Parser)]
#[command(name = "mix-demo")]
#[command(about = "Mix synthetic event sources into per-run files")]
#[command(version)]
struct Cli {
    /// Sources as `name=rate` (events per second)
    #[arg(required = true)]
    sources: Vec<SourceSpec>,

    /// Truth handling for every source: keep, duplicate or prune
    #[arg(long, default_value = "duplicate")]
    truth: TruthMode,

    /// Reopen sources from the start when they run dry
    #[arg(long = "loop")]
    looping: bool,

    /// Events generated per source before it runs dry
    #[arg(long, default_value = "1000")]
    source_events: u64,

    /// First run number
    #[arg(long, default_value = "1")]
    start_run: u32,

    /// Use the current time as the first run's start timestamp
    #[arg(long)]
    wall_clock: bool,

    /// Records per run
    #[arg(long)]
    events: Option<u64>,

    /// Number of runs
    #[arg(long)]
    runs: Option<u32>,

    /// Simulated seconds per run
    #[arg(long)]
    seconds: Option<f64>,

    /// Pace emission against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Seed for arrival clocks and synthetic data
    #[arg(long)]
    seed: Option<u64>,

    /// Output file prefix
    #[arg(long, default_value = "mixed")]
    out: String,
}

impl Cli {
    fn mix_config(&self) -> MixConfig {
        let mut config = MixConfig::default().with_start_run(self.start_run);
        if self.wall_clock {
            config = config.with_start_timestamp(Timestamp::now());
        }
        if let Some(events) = self.events {
            config = config.with_max_events_per_run(events);
        }
        if let Some(runs) = self.runs {
            config = config.with_max_runs(runs);
        }
        if let Some(seconds) = self.seconds {
            config = config.with_max_run_seconds(seconds);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config.with_realtime(self.realtime)
    }

    fn opener(&self) -> SyntheticOpener {
        let base_seed = self.seed.unwrap_or(0);
        self.sources
            .iter()
            .enumerate()
            .fold(SyntheticOpener::new(), |opener, (i, spec)| {
                let seed = base_seed.wrapping_add(1_000 + i as u64);
                let profile = if spec.identifier.starts_with("sig") {
                    SyntheticProfile::bursty(self.source_events, seed)
                } else {
                    SyntheticProfile::single(self.source_events, seed)
                };
                opener.with_profile(spec.identifier.clone(), profile)
            })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.mix_config();
    let sources = cli
        .sources
        .iter()
        .map(|spec| {
            SourceConfig::new(spec.clone())
                .with_truth_mode(cli.truth)
                .with_looping(cli.looping)
        })
        .collect();

    let mut scheduler = Scheduler::open(config, sources, Arc::new(cli.opener()))?;
    let mut sink = RotatingFileSink::new(cli.out.clone(), "jsonl");
    let summary = scheduler.run(&mut sink)?;

    info!(
        runs = summary.runs_completed,
        records = summary.records_emitted,
        discarded = summary.records_discarded,
        files = sink.files().len(),
        "done"
    );
    for path in sink.files() {
        println!("{}", path.display());
    }
    Ok(())
}
