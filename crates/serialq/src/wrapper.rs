//! The serialized resource wrapper
//!
//! Design:
//! - The resource moves into a dedicated worker thread at construction
//!   and comes back through the `JoinHandle` at teardown, so exclusive
//!   access is enforced by ownership, not by a lock around the resource
//! - Producers enqueue closures on the shared [`BoundedQueue`] and may
//!   block under backpressure when the queue is full
//! - The worker drains tasks in FIFO order; a panicking task is caught,
//!   reported through the failure hook, and never stops the loop
//! - Teardown (explicit `close`/`into_inner` or `Drop`) closes the
//!   queue, drains everything already accepted, and joins the worker
//!   before returning

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serialq_core::error::{Closed, ConfigError, TaskError};
use serialq_core::memory::{EstimateMemory, MemoryNode};
use serialq_core::queue::BoundedQueue;
use serialq_core::state::{AtomicLifecycle, Lifecycle};

use crate::config::QueueConfig;
use crate::task::Task;

/// Callback invoked on the worker thread for every failed task
pub type FailureHook = Box<dyn Fn(TaskError) + Send + 'static>;

/// Wraps a non-thread-safe resource and serializes all access to it.
///
/// Any number of threads may [`submit`](Self::submit) closures; exactly
/// one owned worker thread executes them against the resource, one at a
/// time, in queue order. The queue is bounded: when the worker falls
/// behind, producers block instead of growing memory without limit.
///
/// Every accepted task is guaranteed to run before teardown completes.
///
/// # Example
///
/// ```rust
/// use serialq::Serialized;
///
/// let sink = Serialized::new(String::new());
/// sink.submit(|s| s.push_str("hello ")).unwrap();
/// sink.submit(|s| s.push_str("world")).unwrap();
/// assert_eq!(sink.into_inner(), "hello world");
/// ```
pub struct Serialized<R: Send + 'static> {
    queue: Arc<BoundedQueue<Task<R>>>,
    state: Arc<AtomicLifecycle>,
    worker: Option<JoinHandle<R>>,
}

impl<R: Send + 'static> Serialized<R> {
    /// Wrap `resource` with the default configuration.
    pub fn new(resource: R) -> Self {
        Self::with_config(resource, QueueConfig::new()).expect("default queue config is valid")
    }

    /// Wrap `resource` with an explicit configuration.
    ///
    /// Task failures are reported through `tracing::error!`.
    pub fn with_config(resource: R, config: QueueConfig) -> Result<Self, ConfigError> {
        Self::with_failure_hook(resource, config, default_failure_hook)
    }

    /// Wrap `resource` with an explicit configuration and failure hook.
    ///
    /// The hook runs on the worker thread once per failed task, after
    /// the task has been abandoned and before the next one starts.
    pub fn with_failure_hook<H>(
        resource: R,
        config: QueueConfig,
        hook: H,
    ) -> Result<Self, ConfigError>
    where
        H: Fn(TaskError) + Send + 'static,
    {
        config.validate()?;
        let queue = Arc::new(BoundedQueue::new(config.capacity, config.notify_threshold)?);
        let state = Arc::new(AtomicLifecycle::new(Lifecycle::Running));

        let worker = {
            let queue = Arc::clone(&queue);
            let state = Arc::clone(&state);
            thread::Builder::new()
                .name(config.thread_name.clone())
                .spawn(move || worker_loop(resource, queue, state, Box::new(hook)))
                .expect("Failed to spawn serialq worker thread")
        };

        Ok(Self {
            queue,
            state,
            worker: Some(worker),
        })
    }

    /// Queue `f` for execution against the resource.
    ///
    /// Runs exactly once, after this call returns and before teardown
    /// completes, atomically with respect to every other task. Blocks
    /// while the queue is full; the wait is unbounded under sustained
    /// overload.
    ///
    /// Fails with [`Closed`] once shutdown has begun; the closure is
    /// dropped without running.
    pub fn submit<F>(&self, f: F) -> Result<(), Closed>
    where
        F: FnOnce(&mut R) + Send + 'static,
    {
        if !self.state.load().accepts_tasks() {
            return Err(Closed);
        }
        self.queue.push(Task::new(f))
    }

    /// Current lifecycle state
    pub fn state(&self) -> Lifecycle {
        self.state.load()
    }

    /// Number of tasks waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Fill a structured memory report.
    ///
    /// The node's own bytes are the fixed wrapper and queue overhead; a
    /// `buffered tasks` child carries the variable part. The node total
    /// equals [`memory_usage`](EstimateMemory::memory_usage).
    pub fn describe_memory(&self, node: &mut MemoryNode) {
        node.set_bytes(std::mem::size_of::<Self>() + self.queue.fixed_overhead());
        node.add_child("buffered tasks")
            .set_bytes(self.queue.buffered_bytes());
    }

    /// Stop accepting tasks, drain the queue, and join the worker.
    ///
    /// Returns the resource on the first call, `None` on repeated calls
    /// (or if the worker thread itself panicked, which no task can
    /// cause). Called implicitly by `Drop`.
    pub fn close(&mut self) -> Option<R> {
        let worker = self.worker.take()?;
        self.state.store(Lifecycle::Draining);
        tracing::debug!(pending = self.queue.len(), "serialq closing, draining queue");
        self.queue.close();
        let result = worker.join();
        self.state.store(Lifecycle::Stopped);
        result.ok()
    }

    /// Drain, stop, and hand the resource back.
    pub fn into_inner(mut self) -> R {
        self.close().expect("serialq worker thread panicked")
    }
}

impl<R: Send + 'static> EstimateMemory for Serialized<R> {
    /// Footprint of the wrapper and its buffered tasks, excluding the
    /// resource itself.
    fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.queue.memory_usage()
    }
}

impl<R: Send + 'static> Drop for Serialized<R> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Worker thread body: drain tasks until the queue is closed and empty.
fn worker_loop<R: Send + 'static>(
    mut resource: R,
    queue: Arc<BoundedQueue<Task<R>>>,
    state: Arc<AtomicLifecycle>,
    on_failure: FailureHook,
) -> R {
    tracing::debug!(
        capacity = queue.capacity(),
        threshold = queue.threshold(),
        "serialq worker started"
    );

    while let Some(task) = queue.pop() {
        let footprint = task.memory_usage();
        // A panicking task must not take the worker down with it
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| task.run(&mut resource))) {
            on_failure(TaskError::new(panic_message(payload.as_ref()), footprint));
        }
    }

    tracing::debug!("serialq worker stopped");
    resource
}

fn default_failure_hook(err: TaskError) {
    tracing::error!(
        message = err.message(),
        footprint = err.footprint(),
        "task failed on serialq worker"
    );
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::time::Duration;

    const RECORD_LEN: usize = 11;

    /// Append one 11-byte record in several steps, optionally pausing
    /// mid-record to widen the interleaving window.
    fn append_record(sink: &Serialized<String>, i: usize, pause: Duration) {
        sink.submit(move |s| {
            s.push_str("ta");
            if !pause.is_zero() {
                thread::sleep(pause);
            }
            s.push_str("sk ");
            s.push_str(&format!("{:>5}", i));
            s.push('\n');
        })
        .unwrap();
    }

    fn assert_records(output: &str, expected: usize) {
        assert_eq!(output.lines().count(), expected);
        assert_eq!(output.len(), RECORD_LEN * expected);
        for chunk in output.as_bytes().chunks(RECORD_LEN) {
            assert!(
                chunk.starts_with(b"task"),
                "corrupted record: {:?}",
                String::from_utf8_lossy(chunk)
            );
        }
    }

    fn fan_out(sink: &Serialized<String>, producers: usize, messages: usize, pause: Duration) {
        thread::scope(|scope| {
            for t in 0..producers {
                scope.spawn(move || {
                    for i in (t..messages).step_by(producers) {
                        append_record(sink, i, pause);
                    }
                });
            }
        });
    }

    #[test]
    fn test_basic() {
        let sink = Serialized::new(String::new());
        sink.submit(|s| {
            s.push_str("Hello 1");
            s.push_str(" world 1\n");
        })
        .unwrap();
        sink.submit(|s| {
            s.push_str("Hello 2");
            s.push_str(" world 2\n");
        })
        .unwrap();

        assert_eq!(sink.into_inner(), "Hello 1 world 1\nHello 2 world 2\n");
    }

    #[test]
    fn test_threads() {
        let sink = Serialized::new(String::new());
        fan_out(&sink, 10, 1500, Duration::ZERO);
        assert_records(&sink.into_inner(), 1500);
    }

    #[test]
    fn test_threads_slow() {
        let sink = Serialized::new(String::new());
        fan_out(&sink, 2, 50, Duration::from_micros(50));
        assert_records(&sink.into_inner(), 50);
    }

    #[test]
    fn test_threads_slow_low_capacity() {
        let config = QueueConfig::new().capacity(5).notify_threshold(3);
        let sink = Serialized::with_config(String::new(), config).unwrap();
        fan_out(&sink, 2, 50, Duration::from_micros(50));
        assert_records(&sink.into_inner(), 50);
    }

    #[test]
    fn test_threads_low_capacity() {
        let config = QueueConfig::new().capacity(5).notify_threshold(3);
        let sink = Serialized::with_config(String::new(), config).unwrap();
        fan_out(&sink, 8, 2500, Duration::ZERO);
        assert_records(&sink.into_inner(), 2500);
    }

    #[test]
    fn test_backpressure_never_exceeds_capacity() {
        let config = QueueConfig::new().capacity(5).notify_threshold(3);
        let counter = Serialized::with_config(0usize, config).unwrap();

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        counter
                            .submit(|n| {
                                thread::sleep(Duration::from_millis(1));
                                *n += 1;
                            })
                            .unwrap();
                        assert!(counter.pending() <= 5);
                    }
                });
            }
        });

        assert_eq!(counter.into_inner(), 100);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = QueueConfig::new().capacity(0);
        assert_eq!(
            Serialized::with_config(String::new(), config).err(),
            Some(ConfigError::ZeroCapacity)
        );
    }

    #[test]
    fn test_closed_after_shutdown() {
        let mut sink = Serialized::new(String::new());
        assert_eq!(sink.state(), Lifecycle::Running);
        sink.submit(|s| s.push('x')).unwrap();

        let resource = sink.close().expect("first close returns the resource");
        assert_eq!(resource, "x");
        assert_eq!(sink.state(), Lifecycle::Stopped);

        // Late submissions are rejected and never run
        assert_eq!(sink.submit(|s| s.push('y')), Err(Closed));
        assert!(sink.close().is_none());
    }

    #[test]
    fn test_drain_on_teardown() {
        // Tasks queued right before teardown still land in the resource,
        // even with slow execution and a tiny queue.
        let config = QueueConfig::new().capacity(2).notify_threshold(1);
        let log = Serialized::with_config(Vec::new(), config).unwrap();
        for i in 0..10 {
            log.submit(move |v: &mut Vec<usize>| {
                thread::sleep(Duration::from_millis(2));
                v.push(i);
            })
            .unwrap();
        }
        assert_eq!(log.into_inner(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_panicking_task_is_isolated() {
        let failures: Arc<Mutex<Vec<TaskError>>> = Arc::new(Mutex::new(Vec::new()));
        let hook = {
            let failures = Arc::clone(&failures);
            move |err: TaskError| failures.lock().unwrap().push(err)
        };

        let sink =
            Serialized::with_failure_hook(String::new(), QueueConfig::new(), hook).unwrap();
        sink.submit(|s| s.push_str("before\n")).unwrap();
        sink.submit(|_| panic!("boom")).unwrap();
        sink.submit(|s| s.push_str("after\n")).unwrap();

        assert_eq!(sink.into_inner(), "before\nafter\n");

        let failures = failures.lock().unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message(), "boom");
    }

    #[test]
    fn test_memory_debug() {
        let sink = Serialized::new(String::new());

        let mut report = MemoryNode::root("process");
        sink.describe_memory(report.add_child("wrapped sink"));
        assert_eq!(sink.memory_usage(), report.total());
    }

    #[test]
    fn test_memory_usage_bounded_and_draining() {
        let config = QueueConfig::new().capacity(4).notify_threshold(2);
        let log = Serialized::with_config(Vec::<usize>::new(), config).unwrap();
        let baseline = log.memory_usage();

        // Park the worker inside a task, then fill the queue behind it
        let (release_tx, release_rx) = mpsc::channel::<()>();
        log.submit(move |_| release_rx.recv().unwrap()).unwrap();
        for i in 0..4 {
            log.submit(move |v| v.push(i)).unwrap();
        }
        assert_eq!(log.pending(), 4);

        let peak = log.memory_usage();
        assert!(peak > baseline);
        // Configuration-derived upper bound: fixed overhead plus
        // capacity times a generous per-task captured-state size
        assert!(peak <= baseline + 4 * 64);

        // Usage only shrinks while a quiesced queue drains
        release_tx.send(()).unwrap();
        let mut last = peak;
        while log.pending() > 0 {
            let now = log.memory_usage();
            assert!(now <= last);
            last = now;
        }

        assert_eq!(log.into_inner(), vec![0, 1, 2, 3]);
    }
}
