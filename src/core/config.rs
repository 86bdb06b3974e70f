//! # Supervisor configuration.
//!
//! Provides [`SupervisorConfig`] centralized settings for one supervisor.
//!
//! ## Drain timeout
//! - `None` → `stop` waits until every in-flight unit has finished
//! - `Some(Duration::ZERO)` → record what is already finished, cancel the rest
//! - `Some(d)` → wait at most `d`, then cancel what is still pending

use std::time::Duration;

/// Configuration for a [`Supervisor`](crate::Supervisor).
///
/// ## Field semantics
/// - `drain_timeout`: upper bound on how long `stop` waits for in-flight work
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Maximum time `stop` waits before cancelling still-running work.
    pub drain_timeout: Option<Duration>,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,
}

impl SupervisorConfig {
    /// Returns the config with the given drain timeout.
    #[must_use]
    pub fn with_drain_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SupervisorConfig {
    /// Default configuration:
    ///
    /// - `drain_timeout = None` (wait for everything)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            drain_timeout: None,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_waits_indefinitely() {
        let cfg = SupervisorConfig::default();
        assert_eq!(cfg.drain_timeout, None);
        assert_eq!(cfg.bus_capacity, 1024);
    }

    #[test]
    fn bus_capacity_is_clamped() {
        let cfg = SupervisorConfig {
            bus_capacity: 0,
            ..SupervisorConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn with_drain_timeout_overrides() {
        let cfg = SupervisorConfig::default().with_drain_timeout(Some(Duration::ZERO));
        assert_eq!(cfg.drain_timeout, Some(Duration::ZERO));
    }
}
