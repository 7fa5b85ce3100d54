//! Blocking waits and the shutdown signal that can cut them short.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;

/// A wait was cut short because shutdown was requested.
#[derive(Debug, Copy, Clone, Error, PartialEq, Eq)]
#[error("interrupted by shutdown request")]
pub struct Interrupted;

/// Blocking wait used for backoff and throttling.
pub trait Sleeper {
    /// Block for `duration`, or return early with [`Interrupted`].
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted>;

    /// Whether shutdown has already been requested.
    fn is_interrupted(&self) -> bool {
        false
    }
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        (**self).sleep(duration)
    }

    fn is_interrupted(&self) -> bool {
        (**self).is_interrupted()
    }
}

impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        (**self).sleep(duration)
    }

    fn is_interrupted(&self) -> bool {
        (**self).is_interrupted()
    }
}

#[derive(Debug, Default)]
struct ShutdownState {
    triggered: Mutex<bool>,
    wake: Condvar,
}

/// Process-wide shutdown flag. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    state: Arc<ShutdownState>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every waiter.
    pub fn trigger(&self) {
        let mut triggered = self
            .state
            .triggered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *triggered = true;
        self.state.wake.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self
            .state
            .triggered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait up to `timeout`; returns `true` if shutdown was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let triggered = self
            .state
            .triggered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (triggered, _) = self
            .state
            .wake
            .wait_timeout_while(triggered, timeout, |triggered| !*triggered)
            .unwrap_or_else(PoisonError::into_inner);
        *triggered
    }
}

/// Real-time sleeper that wakes early on shutdown.
#[derive(Debug, Clone, Default)]
pub struct ThreadSleeper {
    shutdown: Shutdown,
}

impl ThreadSleeper {
    pub fn new(shutdown: Shutdown) -> Self {
        Self { shutdown }
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }
}

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        if self.shutdown.wait_timeout(duration) {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }

    fn is_interrupted(&self) -> bool {
        self.shutdown.is_triggered()
    }
}

/// Sleeper that returns immediately and records every requested wait.
///
/// For tests and dry runs. Optionally reports an interrupt from the n-th
/// sleep onwards.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
    interrupt_on: Option<usize>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interrupt the `n`-th sleep (1-based) and every later one.
    pub fn interrupt_on(n: usize) -> Self {
        Self {
            slept: Mutex::new(Vec::new()),
            interrupt_on: Some(n),
        }
    }

    /// Every requested wait, in order.
    pub fn slept(&self) -> Vec<Duration> {
        self.slept
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn total(&self) -> Duration {
        self.slept().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let mut slept = self.slept.lock().unwrap_or_else(PoisonError::into_inner);
        slept.push(duration);
        match self.interrupt_on {
            Some(n) if slept.len() >= n => Err(Interrupted),
            _ => Ok(()),
        }
    }

    fn is_interrupted(&self) -> bool {
        let slept = self.slept.lock().unwrap_or_else(PoisonError::into_inner);
        matches!(self.interrupt_on, Some(n) if slept.len() >= n)
    }
}
