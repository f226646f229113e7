//! Queued task representation

use serialq_core::memory::EstimateMemory;

/// One opaque unit of work queued for execution against the wrapped
/// resource.
///
/// Fire-and-forget: no return value, no completion signal. The size of
/// the closure's captured state is recorded at creation so buffered
/// tasks can be accounted while they wait.
pub(crate) struct Task<R> {
    job: Box<dyn FnOnce(&mut R) + Send + 'static>,
    footprint: usize,
}

impl<R> Task<R> {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut R) + Send + 'static,
    {
        Self {
            footprint: std::mem::size_of::<F>(),
            job: Box::new(f),
        }
    }

    /// Execute the task against the resource, consuming it
    pub(crate) fn run(self, resource: &mut R) {
        (self.job)(resource)
    }
}

impl<R> EstimateMemory for Task<R> {
    fn memory_usage(&self) -> usize {
        self.footprint
    }
}
