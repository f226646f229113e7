//! Bounded blocking FIFO shared by producers and a single consumer
//!
//! Design:
//! - `Mutex<VecDeque>` plus two condvars (`not_empty`, `not_full`)
//! - Producers block while the queue is full (backpressure)
//! - The consumer blocks while the queue is empty
//! - Consumer wakeups are batched: producers only signal when the queue
//!   was empty before the insert or the depth reached the notify
//!   threshold, so a busy consumer is not re-notified on every push
//! - `close()` wakes every waiter; blocked producers fail with `Closed`,
//!   the consumer keeps popping until the queue is drained
//!
//! Observational helpers read atomic mirrors of the locked state, so
//! concurrent introspection never contends with the hot path.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};

use crate::error::{Closed, ConfigError};
use crate::memory::EstimateMemory;

/// State protected by the queue lock
struct Inner<T> {
    items: VecDeque<T>,
    buffered_bytes: usize,
    closed: bool,
}

/// Fixed-capacity FIFO with blocking push/pop and batched consumer
/// wakeups.
///
/// Exactly one consumer is assumed; any number of producers. FIFO order
/// holds for successfully completed pushes. Once an item is accepted it
/// cannot be withdrawn.
pub struct BoundedQueue<T> {
    inner: Mutex<Inner<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
    threshold: usize,
    /// Mirror of `inner.items.len()`, updated under the lock
    len: AtomicUsize,
    /// Mirror of `inner.buffered_bytes`, updated under the lock
    bytes: AtomicUsize,
}

impl<T: EstimateMemory> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items, proactively
    /// waking the consumer once `threshold` items are pending.
    ///
    /// Requires `1 <= threshold <= capacity`.
    pub fn new(capacity: usize, threshold: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if threshold > capacity {
            return Err(ConfigError::ThresholdExceedsCapacity { threshold, capacity });
        }

        Ok(Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                buffered_bytes: 0,
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            threshold,
            len: AtomicUsize::new(0),
            bytes: AtomicUsize::new(0),
        })
    }

    /// Append an item at the tail, blocking while the queue is full.
    ///
    /// Fails with [`Closed`] once [`close`](Self::close) has been
    /// called, including for producers already blocked on a full queue.
    pub fn push(&self, item: T) -> Result<(), Closed> {
        let mut inner = self.inner.lock().unwrap();

        while inner.items.len() == self.capacity && !inner.closed {
            inner = self.not_full.wait(inner).unwrap();
        }
        if inner.closed {
            return Err(Closed);
        }

        let was_empty = inner.items.is_empty();
        inner.buffered_bytes += item.memory_usage();
        inner.items.push_back(item);
        self.len.store(inner.items.len(), Ordering::Release);
        self.bytes.store(inner.buffered_bytes, Ordering::Release);

        // Wake on the first item (consumer may be parked) or once the
        // batch threshold is reached; intermediate pushes stay silent.
        let wake = was_empty || inner.items.len() >= self.threshold;
        drop(inner);
        if wake {
            self.not_empty.notify_one();
        }

        Ok(())
    }

    /// Remove and return the head item, blocking while the queue is
    /// empty and open.
    ///
    /// Returns `None` only when the queue is closed **and** drained;
    /// items buffered at close time are still handed out.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock().unwrap();

        loop {
            if let Some(item) = inner.items.pop_front() {
                inner.buffered_bytes -= item.memory_usage();
                self.len.store(inner.items.len(), Ordering::Release);
                self.bytes.store(inner.buffered_bytes, Ordering::Release);
                drop(inner);
                // One slot was freed; wake one blocked producer
                self.not_full.notify_one();
                return Some(item);
            }
            if inner.closed {
                return None;
            }
            inner = self.not_empty.wait(inner).unwrap();
        }
    }

    /// Close the queue: reject new pushes and wake every waiter.
    ///
    /// Idempotent. The consumer still drains whatever is buffered.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
        drop(inner);
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    /// Number of pending items
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Estimated bytes buffered in pending items
    #[inline]
    pub fn buffered_bytes(&self) -> usize {
        self.bytes.load(Ordering::Acquire)
    }

    /// Fixed overhead of the queue itself: the struct plus the
    /// preallocated ring of `capacity` slots.
    pub fn fixed_overhead(&self) -> usize {
        std::mem::size_of::<Self>() + self.capacity * std::mem::size_of::<T>()
    }
}

impl<T: EstimateMemory> EstimateMemory for BoundedQueue<T> {
    fn memory_usage(&self) -> usize {
        self.fixed_overhead() + self.buffered_bytes()
    }
}
