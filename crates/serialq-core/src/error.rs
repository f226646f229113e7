//! Error types for serialq

use core::fmt;

/// Error returned when a task is submitted after shutdown has begun.
///
/// The task was not accepted and will never run. Recoverable: the caller
/// decides whether a dropped task is fatal to its own workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closed;

impl fmt::Display for Closed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue closed")
    }
}

impl std::error::Error for Closed {}

/// Invalid capacity/threshold configuration.
///
/// Fatal at construction time; never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Queue capacity of zero would deadlock every producer
    ZeroCapacity,

    /// Wakeup threshold must be at least one
    ZeroThreshold,

    /// Wakeup threshold cannot exceed the queue capacity
    ThresholdExceedsCapacity { threshold: usize, capacity: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => write!(f, "queue capacity must be > 0"),
            ConfigError::ZeroThreshold => write!(f, "notify threshold must be > 0"),
            ConfigError::ThresholdExceedsCapacity { threshold, capacity } => write!(
                f,
                "notify threshold {} exceeds queue capacity {}",
                threshold, capacity
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A task body failed (panicked) while running on the worker thread.
///
/// Never propagated to the submitting thread - the producer already
/// returned by the time the task runs. Reported through the wrapper's
/// failure hook instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskError {
    message: String,
    footprint: usize,
}

impl TaskError {
    pub fn new(message: impl Into<String>, footprint: usize) -> Self {
        Self {
            message: message.into(),
            footprint,
        }
    }

    /// Stringified panic payload of the failed task
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Estimated size of the failed task's captured state, in bytes
    pub fn footprint(&self) -> usize {
        self.footprint
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task failed: {}", self.message)
    }
}

impl std::error::Error for TaskError {}
