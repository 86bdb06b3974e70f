//! # Runtime events emitted by the supervisor.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: supervisor start/stop and drain progress
//! - **Task events**: spawn and the final fate of every watched task
//! - **Subscriber events**: overflow and panics inside subscriber workers
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task
//! name and id, reasons and drain counters.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use watchvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::DrainTimedOut)
//!     .with_timeout(Duration::from_millis(250))
//!     .with_counts(3, 1);
//!
//! assert_eq!(ev.kind, EventKind::DrainTimedOut);
//! assert_eq!(ev.timeout_ms, Some(250));
//! assert_eq!(ev.recorded, Some(3));
//! assert_eq!(ev.cancelled, Some(1));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::tasks::TaskId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Supervisor lifecycle ===
    /// Supervisor moved from Idle to Running.
    SupervisorStarted,

    /// `stop` began draining the in-flight set.
    ///
    /// Sets:
    /// - `timeout_ms`: drain timeout, absent when waiting indefinitely
    /// - `pending`: number of handles being drained
    DrainStarted,

    /// Every in-flight handle finished before the deadline.
    ///
    /// Sets:
    /// - `recorded`: recorder calls issued
    /// - `cancelled`: always `0`
    DrainCompleted,

    /// The drain deadline elapsed with work still pending.
    ///
    /// Sets:
    /// - `timeout_ms`: the elapsed drain timeout
    /// - `recorded`: recorder calls issued
    /// - `cancelled`: cancellation requests issued
    DrainTimedOut,

    /// Supervisor returned to Idle.
    SupervisorStopped,

    // === Task events ===
    /// A unit of work was admitted and spawned.
    ///
    /// Sets:
    /// - `task`, `task_id`
    TaskSpawned,

    /// A finished task's value was passed to the recorder.
    ///
    /// Sets:
    /// - `task`, `task_id`
    TaskRecorded,

    /// A finished task's error was passed to the recorder.
    ///
    /// Sets:
    /// - `task`, `task_id`
    /// - `reason`: error message
    TaskFailed,

    /// A still-pending task was asked to cancel at drain time.
    ///
    /// Sets:
    /// - `task`, `task_id`
    TaskCancelled,

    /// A task finished because the runtime cancelled it; nothing was recorded.
    ///
    /// Sets:
    /// - `task`, `task_id`
    TaskLost,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the task (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Id of the task, if applicable.
    pub task_id: Option<TaskId>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Drain timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Handles entering a drain.
    pub pending: Option<usize>,
    /// Recorder calls issued by a drain.
    pub recorded: Option<usize>,
    /// Cancellation requests issued by a drain.
    pub cancelled: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            task_id: None,
            reason: None,
            timeout_ms: None,
            pending: None,
            recorded: None,
            cancelled: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a task id.
    #[inline]
    pub fn with_task_id(mut self, id: TaskId) -> Self {
        self.task_id = Some(id);
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches the number of handles entering a drain.
    #[inline]
    pub fn with_pending(mut self, n: usize) -> Self {
        self.pending = Some(n);
        self
    }

    /// Attaches drain counters.
    #[inline]
    pub fn with_counts(mut self, recorded: usize, cancelled: usize) -> Self {
        self.recorded = Some(recorded);
        self.cancelled = Some(cancelled);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}
