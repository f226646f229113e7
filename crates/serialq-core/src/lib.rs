//! # serialq-core
//!
//! Core types for the serialq concurrency primitive.
//!
//! This crate is platform-agnostic and contains no worker-thread code.
//! The producer/consumer wrapper that owns the worker thread lives in
//! the `serialq` crate.
//!
//! ## Modules
//!
//! - `queue` - Bounded blocking FIFO shared by producers and the consumer
//! - `state` - Wrapper lifecycle state (Running / Draining / Stopped)
//! - `memory` - Memory estimation trait and introspection collector
//! - `error` - Error types
//! - `env` - Environment variable utilities

pub mod env;
pub mod error;
pub mod memory;
pub mod queue;
pub mod state;

// Re-exports for convenience
pub use env::env_get;
pub use error::{Closed, ConfigError, TaskError};
pub use memory::{EstimateMemory, MemoryNode};
pub use queue::BoundedQueue;
pub use state::{AtomicLifecycle, Lifecycle};
