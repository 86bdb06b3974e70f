//! # Watched work: handles and outcomes.
//!
//! - [`TaskHandle`] - runtime-agnostic handle to running work
//! - [`WatchedTask`] - tokio-backed handle used by the supervisor
//! - [`TaskId`] - id assigned at admission
//! - [`Outcome`], [`Completion`] - what finished work resolves to

mod handle;
mod outcome;

pub(crate) use handle::CancelMode;
pub use handle::{TaskHandle, TaskId, WatchedTask};
pub use outcome::{Completion, Outcome};
