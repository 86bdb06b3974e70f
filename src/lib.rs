//! # watchvisor
//!
//! **Watchvisor** is a small background-task supervisor for tokio.
//!
//! It accepts units of async work, runs them concurrently, reports every
//! outcome (value or failure) to a pluggable [`Recorder`], and shuts down in
//! order: still-running work gets a bounded drain window and is then
//! cancelled.
//!
//! ## Architecture
//! ```text
//!   caller ──► Supervisor ───────────────────────────────┐
//!              │ start / spawn_and_watch / stop          │ publish(Event)
//!              ▼                                         ▼
//!        in_flight: [WatchedTask]                 Bus (broadcast)
//!              │   (JoinHandle + CancellationToken)      │
//!              ▼                                         ▼
//!        drain(handles, drain_timeout)             SubscriberSet
//!         ├─ finished ─► Recorder::record_value     (per-sub queues)
//!         │            └► Recorder::record_error         │
//!         └─ pending  ─► cancel()                   sub.on_event()
//! ```
//!
//! ## Features
//! | Area              | Description                                                | Key types / traits                      |
//! |-------------------|------------------------------------------------------------|-----------------------------------------|
//! | **Supervision**   | Idle/Running state machine, drain on stop.                 | [`Supervisor`], [`State`]               |
//! | **Recording**     | Exactly one recorder call per finished unit of work.       | [`Recorder`], [`MemoryRecorder`]        |
//! | **Handles**       | Runtime-agnostic handle abstraction and bounded multi-wait.| [`TaskHandle`], [`WatchedTask`], [`drain`] |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, tests).     | [`Subscribe`], [`Event`]                |
//! | **Errors**        | Typed boundary and task errors.                            | [`SupervisorError`], [`TaskError`]      |
//! | **Configuration** | Drain timeout and bus sizing.                              | [`SupervisorConfig`]                    |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use watchvisor::{MemoryRecorder, Supervisor, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let recorder = Arc::new(MemoryRecorder::<u64>::new());
//!     let mut sup: Supervisor<u64> = Supervisor::builder(recorder.clone())
//!         .with_drain_timeout(Some(Duration::from_millis(100)))
//!         .build();
//!
//!     sup.start()?;
//!     sup.spawn_and_watch(async { Ok(42) })?;
//!     sup.spawn_and_watch_fn("stuck", |ctx| async move {
//!         ctx.cancelled().await;
//!         Err(TaskError::Canceled)
//!     })?;
//!     sup.stop().await?;
//!
//!     // the stuck task was cancelled, not recorded
//!     assert_eq!(recorder.values(), vec![42]);
//!     assert!(recorder.errors().is_empty());
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod recorder;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{Drained, State, Supervisor, SupervisorBuilder, SupervisorConfig, drain};
pub use error::{SupervisorError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use recorder::{MemoryRecorder, Recorder};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{Completion, Outcome, TaskHandle, TaskId, WatchedTask};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
