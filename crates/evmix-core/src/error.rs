//! Error types for the mixer

use thiserror::Error;

/// Core mixer errors
#[derive(Error, Debug)]
pub enum MixError {
    // Configuration errors
    #[error("Invalid truth mode: {0:?} (expected keep, duplicate or prune)")]
    InvalidTruthMode(String),

    #[error("Invalid rate for source {source_name}: {rate} (must be finite and > 0)")]
    InvalidRate { source_name: String, rate: f64 },

    #[error("Invalid source spec: {0:?} (expected <identifier>=<rate>)")]
    InvalidSourceSpec(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Production errors
    #[error("Source {source_name} produced {count} triggers from one event while keeping truth")]
    MultipleTriggers { source_name: String, count: usize },

    #[error("Read failed on source {source_name}: {reason}")]
    Reader { source_name: String, reason: String },

    // Internal contract violations
    #[error("Pop from empty priority buffer")]
    EmptyBuffer,

    // Sink errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MixError {
    /// True for errors raised while validating configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MixError::InvalidTruthMode(_)
                | MixError::InvalidRate { .. }
                | MixError::InvalidSourceSpec(_)
                | MixError::SourceUnavailable(_)
                | MixError::InvalidConfig(_)
        )
    }
}

/// Result type for mixer operations
pub type MixResult<T> = Result<T, MixError>;
