//! Runtime core: supervisor state machine and drain protocol.
//!
//! Internal modules:
//! - [`supervisor`]: owns the in-flight set, admits work, drains on stop;
//! - [`state`]: Idle/Running transitions and their guards;
//! - [`drain`]: deadline-bounded wait that partitions handles into finished/pending;
//! - [`config`]: drain timeout and bus settings;
//! - [`builder`]: wires bus, subscribers and recorder into a supervisor.

mod builder;
mod config;
mod drain;
mod state;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use config::SupervisorConfig;
pub use drain::{Drained, drain};
pub use state::State;
pub use supervisor::Supervisor;
