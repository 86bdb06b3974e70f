//! # Event subscriber trait.
//!
//! [`Subscribe`] lets callers watch a supervisor's cycles: admissions,
//! recorded and failed work, cancellations at the end of a drain and the
//! drain summary itself.
//!
//! Events reach a subscriber through its own bounded queue and worker task,
//! so a slow or panicking subscriber never holds up `stop`. A panic surfaces
//! as `EventKind::SubscriberPanicked`, a full queue as
//! `EventKind::SubscriberOverflow`.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use async_trait::async_trait;
//! use watchvisor::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct TimedOutDrains(AtomicUsize);
//!
//! #[async_trait]
//! impl Subscribe for TimedOutDrains {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::DrainTimedOut {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "timed-out-drains" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receives supervisor events on a dedicated worker.
///
/// `on_event` runs off the supervisor's path; it should still not block the
/// executor, since the worker shares the runtime with the watched work.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event. Events arrive in publish order.
    async fn on_event(&self, event: &Event);

    /// Name reported in overflow and panic events.
    ///
    /// Falls back to the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue (at least 1 is used).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
