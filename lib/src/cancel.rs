use crate::error::ConvertError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation signal for one conversion request
///
/// The orchestrator observes the token between pipeline steps (never
/// preemptively mid-step); a cancelled run resolves to
/// [`ConvertError::Cancelled`] and discards any partial output.
///
/// Cloning is cheap and all clones observe the same signal.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a fresh, un-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the cancellation signal
    ///
    /// Idempotent; the associated conversion aborts at its next checkpoint.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether the signal has been raised
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Checkpoint helper: `Err(Cancelled)` once the signal is raised
    pub fn check(&self) -> Result<(), ConvertError> {
        if self.is_cancelled() {
            Err(ConvertError::Cancelled)
        } else {
            Ok(())
        }
    }
}
