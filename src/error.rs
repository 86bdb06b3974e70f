//! Error types used by the supervisor and by watched work.
//!
//! This module defines two error enums:
//!
//! - [`SupervisorError`] — contract violations at the supervisor boundary.
//! - [`TaskError`] — failures produced by individual units of work.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logs/metrics.
//! A [`SupervisorError`] is always returned to the caller; a [`TaskError`] is
//! never returned to the caller and only reaches the recorder.

use std::fmt::Display;

use thiserror::Error;

/// # Errors returned by the supervisor lifecycle methods.
///
/// These are caller-usage errors: the supervisor performs no retry and leaves
/// its state untouched when returning one of them.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorError {
    /// `start` was called while the supervisor is already running.
    #[error("supervisor is already running")]
    AlreadyRunning,

    /// `spawn_and_watch` or `stop` was called while the supervisor is idle.
    #[error("supervisor is not running")]
    NotRunning,
}

impl SupervisorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use watchvisor::SupervisorError;
    ///
    /// assert_eq!(SupervisorError::NotRunning.as_label(), "supervisor_not_running");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisorError::AlreadyRunning => "supervisor_already_running",
            SupervisorError::NotRunning => "supervisor_not_running",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SupervisorError::AlreadyRunning => "start called while running".to_string(),
            SupervisorError::NotRunning => "supervisor must be started first".to_string(),
        }
    }
}

/// # Errors produced by a unit of work.
///
/// Whatever a watched future returns as `Err(..)` is handed to
/// [`Recorder::record_error`](crate::Recorder::record_error) verbatim.
/// Panics inside the work are converted into [`TaskError::Panicked`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Work failed with the given cause.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Work panicked; `info` is the panic payload when it was a string.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload or `"unknown panic"`.
        info: String,
    },

    /// Work observed its cancellation token and gave up.
    #[error("context cancelled")]
    Canceled,
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use watchvisor::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err, TaskError::Fail { error: "boom".into() });
    /// ```
    pub fn fail(error: impl Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use watchvisor::TaskError;
    ///
    /// assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
            TaskError::Canceled => "context cancelled".to_string(),
        }
    }

    /// True for [`TaskError::Canceled`].
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }

    /// Builds a [`TaskError::Panicked`] from a panic payload.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        TaskError::Panicked {
            info: panic_message(payload),
        }
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supervisor_error_labels_are_stable() {
        assert_eq!(
            SupervisorError::AlreadyRunning.as_label(),
            "supervisor_already_running"
        );
        assert_eq!(SupervisorError::NotRunning.as_label(), "supervisor_not_running");
        assert_eq!(
            SupervisorError::AlreadyRunning.to_string(),
            "supervisor is already running"
        );
    }

    #[test]
    fn fail_keeps_the_cause() {
        let err = TaskError::fail(std::io::Error::other("disk gone"));
        assert_eq!(err.as_message(), "error: disk gone");
        assert_eq!(err.to_string(), "execution failed: disk gone");
        assert!(!err.is_cancellation());
    }

    #[test]
    fn panic_payloads_are_readable() {
        let s: Box<dyn std::any::Any + Send> = Box::new("static msg");
        assert_eq!(panic_message(s.as_ref()), "static msg");

        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned msg"));
        assert_eq!(
            TaskError::from_panic(owned.as_ref()),
            TaskError::Panicked {
                info: "owned msg".into()
            }
        );

        let other: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
