//! # Example: drain
//!
//! Runs a mix of fast, failing and stuck work under one supervisor and stops
//! it with a short drain window.
//!
//! Demonstrates how to:
//! - Bind a [`Supervisor`] to a [`MemoryRecorder`].
//! - Attach the built-in [`LogWriter`] subscriber.
//! - Observe which work is recorded and which is cancelled by [`Supervisor::stop`].
//!
//! ## Flow
//! ```text
//! start()
//!   ├─► spawn "fast"   (finishes after 50ms with a value)
//!   ├─► spawn "broken" (fails after 100ms)
//!   ├─► spawn "stuck"  (waits for cancellation)
//!   └─► stop() with drain_timeout = 300ms
//!         ├─► record_value("fast")
//!         ├─► record_error("broken")
//!         └─► cancel("stuck")   (token only: it prints and returns, unrecorded)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example drain --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use watchvisor::{LogWriter, MemoryRecorder, Subscribe, Supervisor, TaskError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = Arc::new(MemoryRecorder::<String>::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    let mut sup: Supervisor<String> = Supervisor::builder(recorder.clone())
        .with_drain_timeout(Some(Duration::from_millis(300)))
        .with_subscribers(subs)
        .build();

    sup.start()?;

    sup.spawn_and_watch_fn("fast", |_ctx| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok("fast done".to_string())
    })?;

    sup.spawn_and_watch_fn("broken", |_ctx| async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Err(TaskError::fail("connection refused"))
    })?;

    sup.spawn_and_watch_fn("stuck", |ctx| async move {
        ctx.cancelled().await;
        println!("[stuck] saw cancellation");
        Err(TaskError::Canceled)
    })?;

    sup.stop().await?;
    // flushes the log subscriber; "stuck" gets to print while we wait
    sup.shutdown().await?;

    println!("values: {:?}", recorder.values());
    println!("errors: {:?}", recorder.errors());
    Ok(())
}
