// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::{
    sync::{Arc, Condvar, Mutex, PoisonError},
    time::Duration,
};

/// [`CancelToken`] signals a running scan to stop, typically raised
/// by device button input
///
/// Cancellation is one-way, a cancelled scan cannot be resumed.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<Signal>);

/// Cancellation flag with a condition variable to wake idle loops
#[derive(Debug, Default)]
struct Signal {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl CancelToken {
    /// Create a new (un-cancelled) token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation, waking any loop waiting on this token
    pub fn cancel(&self) {
        #[cfg(feature = "log")]
        log::debug!("scan cancellation requested");

        *self.flag() = true;
        self.0.wake.notify_all();
    }

    /// Check whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.flag()
    }

    /// Wake waiting loops without cancelling, used to deliver a halt
    pub(crate) fn wake(&self) {
        // Holding the lock orders this against a waiter's predicate check
        let _g = self.flag();
        self.0.wake.notify_all();
    }

    /// Wait up to `timeout` for cancellation or for `stop` to become true
    ///
    /// Returns `true` where the caller should stop.
    pub(crate) fn wait_timeout(&self, timeout: Duration, stop: impl Fn() -> bool) -> bool {
        let g = self.flag();
        let (g, _) = self
            .0
            .wake
            .wait_timeout_while(g, timeout, |cancelled| !*cancelled && !stop())
            .unwrap_or_else(PoisonError::into_inner);

        *g || stop()
    }

    fn flag(&self) -> std::sync::MutexGuard<'_, bool> {
        self.0
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
