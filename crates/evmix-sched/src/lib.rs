//! evmix Scheduler - Merges source streams into one time-ordered stream
//!
//! This crate implements the mixing session:
//! - Fixed-point refill across sources before every ordering decision
//! - Run, time and event budgets
//! - Run number, event id and timestamp stamping
//! - Optional real-time pacing and a cooperative stop signal
//! - Sinks for emitted records

pub mod config;
pub mod pacing;
pub mod scheduler;
pub mod sink;
pub mod stop;

pub use config::*;
pub use pacing::*;
pub use scheduler::*;
pub use sink::*;
pub use stop::*;
