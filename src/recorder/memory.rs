//! # In-memory recorder.
//!
//! [`MemoryRecorder`] appends every outcome to an internal list, in the order
//! the supervisor reports them.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::TaskError;
use crate::recorder::Recorder;

#[derive(Debug)]
struct Recorded<T> {
    values: Vec<T>,
    errors: Vec<TaskError>,
}

/// Recorder that keeps values and errors in memory.
///
/// # Example
/// ```rust
/// use watchvisor::{MemoryRecorder, Recorder, TaskError};
///
/// let rec = MemoryRecorder::new();
/// rec.record_value(1u32);
/// rec.record_error(TaskError::fail("boom"));
///
/// assert_eq!(rec.values(), vec![1]);
/// assert_eq!(rec.errors(), vec![TaskError::fail("boom")]);
/// assert_eq!(rec.len(), 2);
/// ```
#[derive(Debug)]
pub struct MemoryRecorder<T> {
    inner: Mutex<Recorded<T>>,
}

impl<T> MemoryRecorder<T> {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Recorded {
                values: Vec::new(),
                errors: Vec::new(),
            }),
        }
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> Vec<TaskError> {
        self.lock().errors.clone()
    }

    /// Total number of recorder calls so far.
    pub fn len(&self) -> usize {
        let guard = self.lock();
        guard.values.len() + guard.errors.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A panicking reader must not hide outcomes from the next one.
    fn lock(&self) -> MutexGuard<'_, Recorded<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> MemoryRecorder<T> {
    /// Values recorded so far.
    pub fn values(&self) -> Vec<T> {
        self.lock().values.clone()
    }
}

impl<T> Default for MemoryRecorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Recorder<T> for MemoryRecorder<T>
where
    T: Send + 'static,
{
    fn record_value(&self, value: T) {
        self.lock().values.push(value);
    }

    fn record_error(&self, error: TaskError) {
        self.lock().errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let rec = MemoryRecorder::<u8>::default();
        assert!(rec.is_empty());
        assert!(rec.values().is_empty());
        assert!(rec.errors().is_empty());
    }

    #[test]
    fn keeps_report_order() {
        let rec = MemoryRecorder::new();
        rec.record_value("a");
        rec.record_value("b");
        rec.record_error(TaskError::Canceled);

        assert_eq!(rec.values(), vec!["a", "b"]);
        assert_eq!(rec.errors(), vec![TaskError::Canceled]);
        assert_eq!(rec.len(), 3);
    }
}
