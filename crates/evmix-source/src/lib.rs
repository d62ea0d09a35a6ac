//! evmix Source - Upstream event sources for the mixer
//!
//! This crate implements the per-source side of mixing:
//! - `<identifier>=<rate>` source specs
//! - Randomized (Poisson) arrival clocks
//! - Upstream stream reader traits and an in-memory reader
//! - Source cursors that split physics events into buffered records

pub mod arrival;
pub mod cursor;
pub mod reader;
pub mod spec;

pub use arrival::*;
pub use cursor::*;
pub use reader::*;
pub use spec::*;
