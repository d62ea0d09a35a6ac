//! Cooperative stop signal
//!
//! The session is pull-driven, so a consumer can always stop by no longer
//! asking for records. The handle makes that explicit and lets another
//! thread (a signal handler, a UI) end the session cleanly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable stop flag shared with a scheduler
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the session to end before its next record
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
