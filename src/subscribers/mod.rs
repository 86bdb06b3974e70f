//! # Event subscribers.
//!
//! ## Architecture
//! ```text
//! Supervisor ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit_arc
//!                                                         ├──► [queue] ─► LogWriter
//!                                                         └──► [queue] ─► custom ...
//! ```
//!
//! - [`Subscribe`] trait implemented by user handlers
//! - [`SubscriberSet`] per-subscriber queues and workers
//! - `LogWriter` stdout printer (feature `logging`)

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
