//! # Supervisor: runs watched work and drains it on stop.
//!
//! The [`Supervisor`] owns the in-flight set, the Idle/Running [`State`], the
//! drain timeout and the [`Recorder`] that receives every outcome.
//!
//! ## Lifecycle
//! ```text
//! start()            Idle ─► Running, fresh cycle token
//!   │
//! spawn_and_watch()  tokio::spawn(work) ─► in_flight.push(WatchedTask)
//!   │                (child token of the cycle token)
//!   ▼
//! stop()
//!   ├─► publish DrainStarted
//!   ├─► drain(in_flight, drain_timeout)  → Drained { finished, pending }
//!   ├─► finished: Value → recorder.record_value  (TaskRecorded)
//!   │             Error → recorder.record_error  (TaskFailed)
//!   │             Aborted → nothing              (TaskLost)
//!   ├─► pending:  handle.cancel()                (TaskCancelled)
//!   ├─► cycle token cancelled
//!   ├─► publish DrainCompleted | DrainTimedOut
//!   └─► Running ─► Idle, publish SupervisorStopped
//!
//! shutdown()         stop() if running, then flush every subscriber queue
//! ```
//!
//! ## Rules
//! - Every handle finished at drain time yields exactly one recorder call.
//! - No handle is both recorded and cancelled; cancellation is never recorded.
//! - Task failures never reach the caller of `stop`.
//! - `stop` returns `Ok(())` for clean and timed-out drains alike.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use watchvisor::{MemoryRecorder, Supervisor, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let recorder = Arc::new(MemoryRecorder::<u32>::new());
//!     let mut sup: Supervisor<u32> =
//!         Supervisor::new(recorder.clone(), Some(Duration::from_secs(1)));
//!
//!     sup.start()?;
//!     sup.spawn_and_watch(async { Ok(1) })?;
//!     sup.spawn_and_watch(async { Err(TaskError::fail("boom")) })?;
//!     sup.stop().await?;
//!
//!     assert_eq!(recorder.values(), vec![1]);
//!     assert_eq!(recorder.errors(), vec![TaskError::fail("boom")]);
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::builder::SupervisorBuilder;
use crate::core::config::SupervisorConfig;
use crate::core::drain::{Drained, drain};
use crate::core::state::State;
use crate::error::{SupervisorError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::recorder::Recorder;
use crate::subscribers::SubscriberSet;
use crate::tasks::{CancelMode, Completion, Outcome, TaskHandle, TaskId, WatchedTask};

/// Runs units of work concurrently and records their outcomes.
///
/// `start`, `spawn_and_watch` and `stop` take `&mut self`: they are meant to
/// be called from one logical sequence, while the work itself runs on the
/// tokio runtime.
pub struct Supervisor<T> {
    cfg: SupervisorConfig,
    recorder: Arc<dyn Recorder<T>>,
    state: State,
    in_flight: Vec<WatchedTask<T>>,
    /// Parent of every task token of the current cycle.
    cycle: CancellationToken,
    next_id: u64,
    bus: Bus,
    /// Stops the subscriber listener on shutdown or drop.
    listener: CancellationToken,
    /// Listener task; `None` without subscribers.
    listener_task: Option<JoinHandle<()>>,
}

impl<T> Supervisor<T>
where
    T: Send + 'static,
{
    /// Creates an idle supervisor without subscribers.
    ///
    /// `drain_timeout = None` makes `stop` wait for all in-flight work.
    pub fn new<R: Recorder<T>>(recorder: Arc<R>, drain_timeout: Option<Duration>) -> Self {
        SupervisorBuilder::new(recorder)
            .with_config(SupervisorConfig::default().with_drain_timeout(drain_timeout))
            .build()
    }

    /// Returns a builder for config and subscribers.
    pub fn builder<R: Recorder<T>>(recorder: Arc<R>) -> SupervisorBuilder<T> {
        SupervisorBuilder::new(recorder)
    }

    pub(crate) fn from_parts(
        cfg: SupervisorConfig,
        recorder: Arc<dyn Recorder<T>>,
        bus: Bus,
        listener: CancellationToken,
        listener_task: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            cfg,
            recorder,
            state: State::Idle,
            in_flight: Vec::new(),
            cycle: CancellationToken::new(),
            next_id: 0,
            bus,
            listener,
            listener_task,
        }
    }

    /// Idle → Running.
    ///
    /// Fails with [`SupervisorError::AlreadyRunning`] if already running; the
    /// in-flight set is left untouched in that case.
    pub fn start(&mut self) -> Result<(), SupervisorError> {
        self.state.start()?;
        self.in_flight.clear();
        self.cycle = CancellationToken::new();
        self.bus.publish(Event::new(EventKind::SupervisorStarted));
        Ok(())
    }

    /// Spawns `work` and watches it until the next [`stop`](Self::stop).
    ///
    /// Returns immediately. Fails with [`SupervisorError::NotRunning`] while
    /// idle, in which case `work` is dropped without being polled. Work still
    /// pending when the drain ends is aborted at its next await point.
    pub fn spawn_and_watch<Fut>(&mut self, work: Fut) -> Result<TaskId, SupervisorError>
    where
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        self.admit(None, CancelMode::Abort, |_ctx| work)
    }

    /// Like [`spawn_and_watch`](Self::spawn_and_watch), for work that cancels cooperatively.
    ///
    /// `f` is called right away with the task's own [`CancellationToken`],
    /// which is cancelled if the task is still pending when the drain ends.
    /// The work is not aborted: it keeps running until it observes the token,
    /// and whatever it returns afterwards is discarded. `f` is not called when
    /// the supervisor is idle.
    ///
    /// # Example
    /// ```rust
    /// # use std::sync::Arc;
    /// # use std::time::Duration;
    /// # use watchvisor::{MemoryRecorder, Supervisor, TaskError};
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), watchvisor::SupervisorError> {
    /// let recorder = Arc::new(MemoryRecorder::<&str>::new());
    /// let mut sup: Supervisor<&'static str> = Supervisor::new(recorder.clone(), Some(Duration::ZERO));
    /// sup.start()?;
    /// sup.spawn_and_watch_fn("poller", |ctx| async move {
    ///     ctx.cancelled().await;
    ///     Err(TaskError::Canceled)
    /// })?;
    /// sup.stop().await?;
    /// assert!(recorder.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn_and_watch_fn<F, Fut>(
        &mut self,
        name: impl Into<Arc<str>>,
        f: F,
    ) -> Result<TaskId, SupervisorError>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        self.admit(Some(name.into()), CancelMode::Cooperative, f)
    }

    /// Drains the in-flight set and returns to Idle.
    ///
    /// Waits up to the drain timeout, records every finished task, cancels
    /// every pending one without waiting for it. Fails with
    /// [`SupervisorError::NotRunning`] while idle.
    ///
    /// ### Cancel safety
    /// If this future is dropped mid-drain, the remaining handles are dropped
    /// (which cancels them), nothing more is recorded and the supervisor stays
    /// Running with an empty in-flight set.
    pub async fn stop(&mut self) -> Result<(), SupervisorError> {
        self.state.ensure_running()?;

        let handles = std::mem::take(&mut self.in_flight);
        let timeout = self.cfg.drain_timeout;
        let started = with_timeout(Event::new(EventKind::DrainStarted), timeout);
        self.bus.publish(started.with_pending(handles.len()));

        let Drained { finished, pending } = drain(handles, timeout).await;

        let mut recorded = 0;
        for (handle, completion) in finished {
            if self.record(&handle, completion) {
                recorded += 1;
            }
        }
        for handle in &pending {
            handle.cancel();
            self.bus.publish(task_event(EventKind::TaskCancelled, handle));
        }
        self.cycle.cancel();

        let kind = if pending.is_empty() {
            EventKind::DrainCompleted
        } else {
            EventKind::DrainTimedOut
        };
        let summary = with_timeout(Event::new(kind), timeout);
        self.bus.publish(summary.with_counts(recorded, pending.len()));

        self.state.stop()?;
        self.bus.publish(Event::new(EventKind::SupervisorStopped));
        Ok(())
    }

    /// Stops the supervisor if it is running, then flushes the subscribers.
    ///
    /// Returns once every subscriber has handled the events published so far,
    /// including the ones of this final `stop`.
    pub async fn shutdown(mut self) -> Result<(), SupervisorError> {
        if self.state.is_running() {
            self.stop().await?;
        }
        self.listener.cancel();
        if let Some(task) = self.listener_task.take() {
            let _ = task.await;
        }
        Ok(())
    }

    /// True between a successful `start` and the end of the following `stop`.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Number of handles currently watched.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn drain_timeout(&self) -> Option<Duration> {
        self.cfg.drain_timeout
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.cfg
    }

    pub fn recorder(&self) -> &Arc<dyn Recorder<T>> {
        &self.recorder
    }

    /// Receiver for events published from now on.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    fn admit<F, Fut>(
        &mut self,
        name: Option<Arc<str>>,
        mode: CancelMode,
        f: F,
    ) -> Result<TaskId, SupervisorError>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        self.state.ensure_running()?;

        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        let name = name.unwrap_or_else(|| format!("task-{id}").into());
        let token = self.cycle.child_token();

        let handle = WatchedTask::spawn(id, name, token.clone(), mode, f(token));
        self.bus.publish(task_event(EventKind::TaskSpawned, &handle));
        self.in_flight.push(handle);
        Ok(id)
    }

    /// Routes one completion to the recorder. Returns whether a call was made.
    fn record(&self, handle: &WatchedTask<T>, completion: Completion<T>) -> bool {
        match completion {
            Completion::Finished(Outcome::Value(v)) => {
                self.recorder.record_value(v);
                self.bus.publish(task_event(EventKind::TaskRecorded, handle));
                true
            }
            Completion::Finished(Outcome::Error(e)) => {
                let reason = e.to_string();
                self.recorder.record_error(e);
                self.bus
                    .publish(task_event(EventKind::TaskFailed, handle).with_reason(reason));
                true
            }
            Completion::Aborted => {
                self.bus.publish(task_event(EventKind::TaskLost, handle));
                false
            }
        }
    }
}

impl<T> Drop for Supervisor<T> {
    fn drop(&mut self) {
        // in-flight handles cancel themselves on drop
        self.cycle.cancel();
        self.listener.cancel();
    }
}

fn task_event<H: TaskHandle>(kind: EventKind, handle: &H) -> Event {
    Event::new(kind)
        .with_task(handle.name())
        .with_task_id(handle.id())
}

fn with_timeout(ev: Event, timeout: Option<Duration>) -> Event {
    match timeout {
        Some(t) => ev.with_timeout(t),
        None => ev,
    }
}

/// Forwards bus events to the subscriber set until `stop` is cancelled.
///
/// Events already buffered when the token fires are still delivered, then the
/// set is shut down so its workers finish their queues before the task ends.
pub(crate) fn spawn_subscriber_listener(
    bus: &Bus,
    set: SubscriberSet,
    stop: CancellationToken,
) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit_arc(Arc::new(ev)),
                    Err(RecvError::Lagged(_)) => {
                        set.emit_arc(Arc::new(Event::subscriber_overflow("listener", "lagged")));
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = stop.cancelled() => break,
            }
        }
        while let Ok(ev) = rx.try_recv() {
            set.emit_arc(Arc::new(ev));
        }
        set.shutdown().await;
    })
}
