//! # serialq - Serialized Resource Wrapper
//!
//! Many producer threads, one non-thread-safe resource, exactly one
//! thread touching it at a time.
//!
//! [`Serialized<R>`] wraps a resource (an output sink, an accumulating
//! statistics object, any single-writer state) and owns a single worker
//! thread that executes submitted closures against it in FIFO order.
//! Call sites never take a lock around the resource: they hand the
//! wrapper a closure and move on.
//!
//! ## Features
//!
//! - **Bounded queue**: a fixed-capacity FIFO between producers and the
//!   worker; full queue blocks producers (backpressure) instead of
//!   growing memory without limit
//! - **Batched wakeups**: the worker is proactively notified at a
//!   configurable queue depth, not on every enqueue
//! - **Guaranteed drain**: teardown runs every already-accepted task
//!   before the worker exits; late submissions fail with [`Closed`]
//! - **Failure isolation**: a panicking task is caught and reported
//!   through a failure hook; the worker keeps going
//! - **Memory accounting**: buffered tasks are estimated and reported
//!   through a structured collector for budget enforcement
//!
//! ## Quick Start
//!
//! ```rust
//! use serialq::Serialized;
//! use std::thread;
//!
//! let sink = Serialized::new(String::new());
//!
//! thread::scope(|scope| {
//!     for t in 0..4 {
//!         let sink = &sink;
//!         scope.spawn(move || {
//!             sink.submit(move |s| s.push_str(&format!("line {}\n", t)))
//!                 .unwrap();
//!         });
//!     }
//! });
//!
//! // Drains the queue, joins the worker, hands the sink back
//! let output = sink.into_inner();
//! assert_eq!(output.lines().count(), 4);
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  producer threads                    owned worker thread
//!  ┌──────────┐
//!  │ submit() ├──┐
//!  └──────────┘  │   ┌──────────────┐   ┌───────────┐   ┌──────────┐
//!  ┌──────────┐  ├──▶│ BoundedQueue │──▶│ pop loop  │──▶│ resource │
//!  │ submit() ├──┘   │ (cap, thres) │   │ run tasks │   │  &mut R  │
//!  └──────────┘      └──────────────┘   └───────────┘   └──────────┘
//!        ▲ blocks while full                 │ exits on close + empty
//! ```

pub mod config;
mod task;
pub mod wrapper;

// Re-export core types
pub use serialq_core::{
    Closed,
    ConfigError,
    EstimateMemory,
    Lifecycle,
    MemoryNode,
    TaskError,
};

pub use config::QueueConfig;
pub use wrapper::{FailureHook, Serialized};
