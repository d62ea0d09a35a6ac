//! evmix Test Harness - Synthetic sources and end-to-end checks
//!
//! This crate provides:
//! - Seeded synthetic physics-event streams with configurable shape
//! - A stream opener serving named synthetic profiles
//! - A mixing harness that drains a session and checks its output

pub mod generator;
pub mod integration;

pub use generator::*;
pub use integration::*;
