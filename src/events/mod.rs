//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor` (lifecycle, drain, per-task fate) and
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the listener spawned by `SupervisorBuilder::build`, which
//!   fans events out to the `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
