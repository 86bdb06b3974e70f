//! # Supervisor run state.
//!
//! ```text
//!            start()              stop()
//!   Idle ──────────────► Running ─────────► Idle
//!    ▲  start() while Running → AlreadyRunning
//!    └─ spawn_and_watch()/stop() while Idle → NotRunning
//! ```
//!
//! All transition guards live here so the supervisor never checks a flag by hand.

use crate::error::SupervisorError;

/// Two-state lifecycle of a supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Not accepting work (initial and post-`stop` state).
    #[default]
    Idle,
    /// Between a successful `start` and the end of the following `stop`.
    Running,
}

impl State {
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, State::Running)
    }

    /// Idle → Running.
    pub(crate) fn start(&mut self) -> Result<(), SupervisorError> {
        match self {
            State::Idle => {
                *self = State::Running;
                Ok(())
            }
            State::Running => Err(SupervisorError::AlreadyRunning),
        }
    }

    /// Guard for operations that need a running supervisor.
    pub(crate) fn ensure_running(self) -> Result<(), SupervisorError> {
        if self.is_running() {
            Ok(())
        } else {
            Err(SupervisorError::NotRunning)
        }
    }

    /// Running → Idle.
    pub(crate) fn stop(&mut self) -> Result<(), SupervisorError> {
        self.ensure_running()?;
        *self = State::Idle;
        Ok(())
    }
}
