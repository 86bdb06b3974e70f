//! # Terminal results of watched work.
//!
//! - [`Outcome`] is what a recorder sees: a value or an error.
//! - [`Completion`] is what a finished handle yields: an outcome, or the
//!   information that the runtime aborted the work (which is never recorded).

use crate::error::TaskError;

/// Terminal result of a unit of work, excluding cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Work finished and produced a value.
    Value(T),
    /// Work finished by failing (returned `Err` or panicked).
    Error(TaskError),
}

impl<T> Outcome<T> {
    /// Classifies the result returned by the work.
    pub fn from_result(res: Result<T, TaskError>) -> Self {
        match res {
            Ok(v) => Outcome::Value(v),
            Err(e) => Outcome::Error(e),
        }
    }
}

/// What a finished [`TaskHandle`](crate::TaskHandle) resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// The work ran to completion; exactly one recorder call follows.
    Finished(Outcome<T>),
    /// The runtime cancelled the work before it completed; nothing is recorded.
    Aborted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_result_classifies() {
        assert_eq!(Outcome::from_result(Ok::<_, TaskError>(7)), Outcome::Value(7));

        let err = Outcome::<u8>::from_result(Err(TaskError::fail("x")));
        assert_eq!(err, Outcome::Error(TaskError::fail("x")));
    }
}
