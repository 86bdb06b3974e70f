//! # Recorder trait.
//!
//! ## Rules
//! - Exactly one call per finished unit of work: [`Recorder::record_value`]
//!   on success, [`Recorder::record_error`] on failure.
//! - Work cancelled at drain time produces no call.
//! - Calls are issued one at a time from within `Supervisor::stop`.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use watchvisor::{Recorder, TaskError};
//!
//! #[derive(Default)]
//! struct Counter {
//!     ok: AtomicUsize,
//!     failed: AtomicUsize,
//! }
//!
//! impl Recorder<String> for Counter {
//!     fn record_value(&self, _value: String) {
//!         self.ok.fetch_add(1, Ordering::Relaxed);
//!     }
//!
//!     fn record_error(&self, _error: TaskError) {
//!         self.failed.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//! ```

use crate::error::TaskError;

/// Sink for the outcomes of finished work.
///
/// ### Implementation requirements
/// - Do not block: calls happen inside the async `stop`.
/// - Handle storage errors internally; the supervisor ignores them.
pub trait Recorder<T>: Send + Sync + 'static {
    /// Stores the value produced by work that finished without failure.
    fn record_value(&self, value: T);

    /// Stores the failure of work that finished by failing.
    fn record_error(&self, error: TaskError);
}
