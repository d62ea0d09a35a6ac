//! evmix Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the mixer:
//! - Identifiers (RunNumber, EventId)
//! - Absolute timestamps
//! - Physics events, triggers and output records
//! - Truth payload handling modes
//! - The time-keyed priority buffer
//! - The shared error type

pub mod buffer;
pub mod error;
pub mod event;
pub mod id;
pub mod record;
pub mod time;
pub mod truth;

pub use buffer::*;
pub use error::*;
pub use event::*;
pub use id::*;
pub use record::*;
pub use time::*;
pub use truth::*;
