//! # Handles to running work.
//!
//! [`TaskHandle`] abstracts "a unit of concurrently running work" so the drain
//! logic does not depend on a particular runtime primitive. A handle:
//! - resolves (as a [`Future`]) to a [`Completion`] once the work is done;
//! - reports whether it is already finished without blocking;
//! - accepts a cancellation request at any time.
//!
//! [`WatchedTask`] is the tokio-backed implementation the supervisor uses: a
//! [`JoinHandle`] paired with the work's own [`CancellationToken`].
//!
//! ## Cancellation
//! ```text
//! WatchedTask::cancel()
//!   ├─► token.cancel()                 (always)
//!   └─► join.abort()                   (CancelMode::Abort only)
//! ```
//! Work admitted with its token (`CancelMode::Cooperative`) keeps running
//! until it observes `ctx.cancelled()` and returns; its late result is
//! discarded. Work that never saw the token is aborted at its next await
//! point. Neither step is awaited. Dropping an unfinished [`WatchedTask`] does
//! the same.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::tasks::outcome::{Completion, Outcome};

/// Identifier assigned to every admitted unit of work.
///
/// Ids are unique per supervisor and increase monotonically across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to one unit of concurrently running work.
///
/// Polling the handle after it returned `Ready` is not supported; the drain
/// polls each handle to completion at most once.
pub trait TaskHandle: Future<Output = Completion<Self::Value>> + Unpin + Send {
    /// Value produced by the work on success.
    type Value: Send + 'static;

    /// Id assigned at admission.
    fn id(&self) -> TaskId;

    /// Human-readable name used in events.
    fn name(&self) -> &str;

    /// True once the work is done (completed, failed, panicked or aborted).
    fn is_finished(&self) -> bool;

    /// Requests cancellation. Returns immediately.
    fn cancel(&self);
}

/// How a [`WatchedTask`] stops its work when cancelled or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CancelMode {
    /// The work holds the token; only the token is cancelled.
    Cooperative,
    /// The work never saw the token; the tokio task is aborted.
    Abort,
}

/// Tokio-backed [`TaskHandle`].
pub struct WatchedTask<T> {
    id: TaskId,
    name: Arc<str>,
    join: JoinHandle<Result<T, TaskError>>,
    token: CancellationToken,
    mode: CancelMode,
}

impl<T> WatchedTask<T>
where
    T: Send + 'static,
{
    /// Spawns `fut` on the current tokio runtime.
    ///
    /// `token` is the work's own token. With `CancelMode::Cooperative` the
    /// same token must have been handed to the work.
    pub(crate) fn spawn<Fut>(
        id: TaskId,
        name: Arc<str>,
        token: CancellationToken,
        mode: CancelMode,
        fut: Fut,
    ) -> Self
    where
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        let join = tokio::spawn(fut);
        Self {
            id,
            name,
            join,
            token,
            mode,
        }
    }
}

impl<T> WatchedTask<T> {
    fn interrupt(&self) {
        self.token.cancel();
        if self.mode == CancelMode::Abort {
            self.join.abort();
        }
    }
}

impl<T> Future for WatchedTask<T> {
    type Output = Completion<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let completion = match ready!(Pin::new(&mut self.join).poll(cx)) {
            Ok(res) => Completion::Finished(Outcome::from_result(res)),
            Err(je) if je.is_panic() => {
                let payload = je.into_panic();
                Completion::Finished(Outcome::Error(TaskError::from_panic(payload.as_ref())))
            }
            Err(_cancelled) => Completion::Aborted,
        };
        Poll::Ready(completion)
    }
}

impl<T> TaskHandle for WatchedTask<T>
where
    T: Send + 'static,
{
    type Value = T;

    fn id(&self) -> TaskId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    fn cancel(&self) {
        self.interrupt();
    }
}

/// A dropped handle never leaves its work running uncancelled.
impl<T> Drop for WatchedTask<T> {
    fn drop(&mut self) {
        if !self.join.is_finished() {
            self.interrupt();
        }
    }
}

impl<T> fmt::Debug for WatchedTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchedTask")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("finished", &self.join.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn watch<Fut>(raw: u64, fut: Fut) -> WatchedTask<u32>
    where
        Fut: Future<Output = Result<u32, TaskError>> + Send + 'static,
    {
        WatchedTask::spawn(
            TaskId::new(raw),
            "t".into(),
            CancellationToken::new(),
            CancelMode::Abort,
            fut,
        )
    }

    /// Spawns work that waits for its token, then sets `exited` and reports cancellation.
    fn cooperative(raw: u64, exited: Arc<AtomicBool>) -> WatchedTask<u32> {
        let token = CancellationToken::new();
        let ctx = token.clone();
        WatchedTask::spawn(
            TaskId::new(raw),
            "coop".into(),
            token,
            CancelMode::Cooperative,
            async move {
                ctx.cancelled().await;
                exited.store(true, Ordering::SeqCst);
                Err(TaskError::Canceled)
            },
        )
    }

    #[tokio::test]
    async fn resolves_to_value() {
        let h = watch(1, async { Ok(5) });
        assert_eq!(h.await, Completion::Finished(Outcome::Value(5)));
    }

    #[tokio::test]
    async fn panic_becomes_error_outcome() {
        let h = watch(2, async {
            let explode = true;
            if explode {
                panic!("kaboom");
            }
            Ok(0)
        });
        assert_eq!(
            h.await,
            Completion::Finished(Outcome::Error(TaskError::Panicked {
                info: "kaboom".into()
            }))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_and_trips_token() {
        let token = CancellationToken::new();
        let seen = token.clone();
        let h: WatchedTask<u32> = WatchedTask::spawn(
            TaskId::new(3),
            "sleeper".into(),
            token,
            CancelMode::Abort,
            async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(0)
            },
        );
        assert!(!h.is_finished());

        h.cancel();
        assert!(seen.is_cancelled());
        assert_eq!(h.await, Completion::Aborted);
    }

    #[tokio::test(start_paused = true)]
    async fn cooperative_cancel_lets_work_return() {
        let exited = Arc::new(AtomicBool::new(false));
        let h = cooperative(4, exited.clone());

        h.cancel();
        assert_eq!(
            h.await,
            Completion::Finished(Outcome::Error(TaskError::Canceled))
        );
        assert!(exited.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cooperative_handle_still_signals_work() {
        let exited = Arc::new(AtomicBool::new(false));
        let h = cooperative(5, exited.clone());
        tokio::task::yield_now().await;
        assert!(!exited.load(Ordering::SeqCst));

        drop(h);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(exited.load(Ordering::SeqCst));
    }

    #[test]
    fn task_id_display() {
        assert_eq!(TaskId::new(42).to_string(), "42");
        assert_eq!(TaskId::new(42).as_u64(), 42);
    }
}
