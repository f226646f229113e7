//! Wrapper lifecycle state

use core::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a serialized wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Lifecycle {
    /// Worker active, accepting submissions
    Running = 0,

    /// Shutdown requested; no new submissions, worker flushing the queue
    Draining = 1,

    /// Worker joined, resource access relinquished
    Stopped = 2,
}

impl Lifecycle {
    /// Check whether new tasks are still accepted in this state
    #[inline]
    pub const fn accepts_tasks(&self) -> bool {
        matches!(self, Lifecycle::Running)
    }

    /// Check whether the worker has terminated
    #[inline]
    pub const fn is_stopped(&self) -> bool {
        matches!(self, Lifecycle::Stopped)
    }
}

impl From<u8> for Lifecycle {
    fn from(v: u8) -> Self {
        match v {
            0 => Lifecycle::Running,
            1 => Lifecycle::Draining,
            _ => Lifecycle::Stopped,
        }
    }
}

impl From<Lifecycle> for u8 {
    fn from(state: Lifecycle) -> u8 {
        state as u8
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Running => write!(f, "RUNNING"),
            Lifecycle::Draining => write!(f, "DRAINING"),
            Lifecycle::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// Atomic cell holding a [`Lifecycle`], shared between the owning
/// thread and the worker.
pub struct AtomicLifecycle(AtomicU8);

impl AtomicLifecycle {
    pub fn new(state: Lifecycle) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    #[inline]
    pub fn load(&self) -> Lifecycle {
        Lifecycle::from(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn store(&self, state: Lifecycle) {
        self.0.store(state as u8, Ordering::Release);
    }
}

impl Default for AtomicLifecycle {
    fn default() -> Self {
        Self::new(Lifecycle::Running)
    }
}

impl fmt::Debug for AtomicLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicLifecycle").field(&self.load()).finish()
    }
}
