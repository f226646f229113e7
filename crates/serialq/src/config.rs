//! Wrapper configuration
//!
//! Compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder methods (programmatic)
//! 2. Environment variables (runtime)
//! 3. Library defaults
//!
//! # Example
//!
//! ```rust
//! use serialq::QueueConfig;
//!
//! let config = QueueConfig::from_env()
//!     .capacity(5)
//!     .notify_threshold(3);
//! assert!(config.validate().is_ok());
//! ```

use serialq_core::env::env_get;
use serialq_core::error::ConfigError;

/// Compile-time defaults
pub mod defaults {
    /// Maximum pending tasks before producers block
    pub const CAPACITY: usize = 100;

    /// Pending tasks before the worker is proactively woken
    pub const NOTIFY_THRESHOLD: usize = 50;

    /// Name given to the worker thread
    pub const THREAD_NAME: &str = "serialq-worker";
}

/// Queue and worker configuration with builder pattern.
///
/// Use `from_env()` to start with compile-time defaults and apply any
/// environment variable overrides.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Maximum pending tasks; producers block once reached
    pub capacity: usize,
    /// Pending tasks before the worker is proactively woken
    pub notify_threshold: usize,
    /// Worker thread name
    pub thread_name: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl QueueConfig {
    /// Create config from compile-time defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `SERIALQ_CAPACITY` - Maximum pending tasks
    /// - `SERIALQ_NOTIFY_THRESHOLD` - Wakeup threshold
    /// - `SERIALQ_THREAD_NAME` - Worker thread name
    pub fn from_env() -> Self {
        Self {
            capacity: env_get("SERIALQ_CAPACITY", defaults::CAPACITY),
            notify_threshold: env_get("SERIALQ_NOTIFY_THRESHOLD", defaults::NOTIFY_THRESHOLD),
            thread_name: env_get("SERIALQ_THREAD_NAME", defaults::THREAD_NAME.to_string()),
        }
    }

    /// Create config with explicit defaults (no env override).
    /// Useful for testing or when you want full control.
    pub fn new() -> Self {
        Self {
            capacity: defaults::CAPACITY,
            notify_threshold: defaults::NOTIFY_THRESHOLD,
            thread_name: defaults::THREAD_NAME.to_string(),
        }
    }

    // Builder methods

    pub fn capacity(mut self, n: usize) -> Self {
        self.capacity = n;
        self
    }

    pub fn notify_threshold(mut self, n: usize) -> Self {
        self.notify_threshold = n;
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Validate configuration and return errors if invalid.
    ///
    /// Requires `1 <= notify_threshold <= capacity`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.notify_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.notify_threshold > self.capacity {
            return Err(ConfigError::ThresholdExceedsCapacity {
                threshold: self.notify_threshold,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}
