//! Cooperative run cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable stop handle checked by the trainer once per step boundary.
///
/// Clone one out of the trainer via [`Trainer::stop_flag`][crate::Trainer::stop_flag]
/// and set it from a signal handler or another thread.  The step in flight
/// always completes; the run then winds down, saving the final model as
/// usual.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop.  Takes effect at the next step boundary.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once a stop has been requested.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
