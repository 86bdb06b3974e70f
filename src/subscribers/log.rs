//! # LogWriter — simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [started]
//! [spawned] task="fetch" id=0
//! [drain-started] pending=3 timeout_ms=Some(250)
//! [recorded] task="fetch" id=0
//! [failed] task="parse" id=1 err="execution failed: bad input"
//! [cancelled] task="stuck" id=2
//! [drain-timed-out] recorded=2 cancelled=1 timeout_ms=Some(250)
//! [stopped]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Renders one event as a single log line.
fn format_event(e: &Event) -> String {
    let task = e.task.as_deref().unwrap_or("unknown");
    let id = e.task_id.map(|id| id.to_string()).unwrap_or_default();
    match e.kind {
        EventKind::SupervisorStarted => "[started]".to_string(),
        EventKind::SupervisorStopped => "[stopped]".to_string(),
        EventKind::DrainStarted => format!(
            "[drain-started] pending={} timeout_ms={:?}",
            e.pending.unwrap_or(0),
            e.timeout_ms
        ),
        EventKind::DrainCompleted => {
            format!("[drain-completed] recorded={}", e.recorded.unwrap_or(0))
        }
        EventKind::DrainTimedOut => format!(
            "[drain-timed-out] recorded={} cancelled={} timeout_ms={:?}",
            e.recorded.unwrap_or(0),
            e.cancelled.unwrap_or(0),
            e.timeout_ms
        ),
        EventKind::TaskSpawned => format!("[spawned] task={task:?} id={id}"),
        EventKind::TaskRecorded => format!("[recorded] task={task:?} id={id}"),
        EventKind::TaskFailed => format!(
            "[failed] task={task:?} id={id} err={:?}",
            e.reason.as_deref().unwrap_or("")
        ),
        EventKind::TaskCancelled => format!("[cancelled] task={task:?} id={id}"),
        EventKind::TaskLost => format!("[lost] task={task:?} id={id}"),
        EventKind::SubscriberOverflow => format!(
            "[subscriber-overflow] subscriber={task} reason={}",
            e.reason.as_deref().unwrap_or("unknown")
        ),
        EventKind::SubscriberPanicked => format!(
            "[subscriber-panicked] subscriber={task} info={}",
            e.reason.as_deref().unwrap_or("unknown")
        ),
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", format_event(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskId;

    #[test]
    fn formats_task_lines() {
        let ev = Event::new(EventKind::TaskFailed)
            .with_task("parse")
            .with_task_id(TaskId::new(1))
            .with_reason("execution failed: bad input");
        assert_eq!(
            format_event(&ev),
            r#"[failed] task="parse" id=1 err="execution failed: bad input""#
        );
    }

    #[test]
    fn formats_drain_lines() {
        let ev = Event::new(EventKind::DrainTimedOut)
            .with_timeout(std::time::Duration::from_millis(250))
            .with_counts(2, 1);
        assert_eq!(
            format_event(&ev),
            "[drain-timed-out] recorded=2 cancelled=1 timeout_ms=Some(250)"
        );
    }
}
