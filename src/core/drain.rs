//! # Deadline-bounded wait over many handles.
//!
//! [`drain`] waits for a set of [`TaskHandle`]s to finish, in any order, until
//! an optional deadline, and returns the set split in two:
//!
//! ```text
//! handles ──► FuturesUnordered ──► next() ... next() ──┬─► all done      → pending = []
//!                (one per handle)    (timeout_at)      └─► deadline hit  → pending = rest
//!
//! Drained { finished: [(handle, completion)], pending: [handle] }
//! ```
//!
//! ## Rules
//! - A handle is in exactly one of the two sets.
//! - Membership is decided once, when the wait returns; a handle that finishes
//!   afterwards stays in `pending`.
//! - `Some(Duration::ZERO)` does not wait at all: handles already finished at
//!   the instant of the call are `finished`, everything else is `pending`.
//! - `None` (or a deadline too far to represent) waits for every handle.
//! - Both sets keep the input order.

use std::time::Duration;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::time::{self, Instant};

use crate::tasks::{Completion, TaskHandle};

/// Result of a [`drain`]: disjoint finished and still-pending handles.
pub struct Drained<H: TaskHandle> {
    /// Handles that finished before the deadline, with what they resolved to.
    pub finished: Vec<(H, Completion<H::Value>)>,
    /// Handles still running when the wait returned. Not cancelled yet.
    pub pending: Vec<H>,
}

/// Waits for `handles` up to `timeout` and partitions them.
pub async fn drain<H: TaskHandle>(handles: Vec<H>, timeout: Option<Duration>) -> Drained<H> {
    if timeout == Some(Duration::ZERO) {
        return snapshot(handles).await;
    }

    let deadline = timeout.and_then(|d| Instant::now().checked_add(d));
    let mut handles = handles;
    let mut done: Vec<Option<Completion<H::Value>>> = handles.iter().map(|_| None).collect();

    {
        let mut waiting: FuturesUnordered<_> = handles
            .iter_mut()
            .enumerate()
            .map(|(idx, handle)| async move { (idx, handle.await) })
            .collect();

        loop {
            let next = match deadline {
                Some(at) => match time::timeout_at(at, waiting.next()).await {
                    Ok(next) => next,
                    Err(_elapsed) => break,
                },
                None => waiting.next().await,
            };
            match next {
                Some((idx, completion)) => done[idx] = Some(completion),
                None => break,
            }
        }
    }

    let mut finished = Vec::new();
    let mut pending = Vec::new();
    for (handle, completion) in handles.into_iter().zip(done) {
        match completion {
            Some(c) => finished.push((handle, c)),
            None => pending.push(handle),
        }
    }
    Drained { finished, pending }
}

/// Zero-timeout partition: checks each handle once without waiting.
async fn snapshot<H: TaskHandle>(handles: Vec<H>) -> Drained<H> {
    let mut finished = Vec::new();
    let mut pending = Vec::new();
    for mut handle in handles {
        if handle.is_finished() {
            // output is already available; this does not wait on the work
            let completion = (&mut handle).await;
            finished.push((handle, completion));
        } else {
            pending.push(handle);
        }
    }
    Drained { finished, pending }
}
