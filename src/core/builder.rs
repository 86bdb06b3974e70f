use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::config::SupervisorConfig;
use super::supervisor::{Supervisor, spawn_subscriber_listener};
use crate::{
    events::Bus,
    recorder::Recorder,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Supervisor`] with config and subscribers.
pub struct SupervisorBuilder<T> {
    recorder: Arc<dyn Recorder<T>>,
    cfg: SupervisorConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl<T> SupervisorBuilder<T>
where
    T: Send + 'static,
{
    /// Creates a builder bound to `recorder` with the default configuration.
    pub fn new<R: Recorder<T>>(recorder: Arc<R>) -> Self {
        Self {
            recorder,
            cfg: SupervisorConfig::default(),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: SupervisorConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the drain timeout (`None` = wait for all in-flight work).
    pub fn with_drain_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.cfg.drain_timeout = timeout;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events through dedicated workers with
    /// bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds an idle supervisor.
    ///
    /// With subscribers configured this spawns the subscriber workers and the
    /// bus listener, so it must run inside a tokio runtime.
    pub fn build(self) -> Supervisor<T> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener = CancellationToken::new();

        let listener_task = if self.subscribers.is_empty() {
            None
        } else {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            Some(spawn_subscriber_listener(&bus, set, listener.clone()))
        };

        Supervisor::from_parts(self.cfg, self.recorder, bus, listener, listener_task)
    }
}
