//! # Outcome recorders.
//!
//! The supervisor reports every finished unit of work to exactly one
//! [`Recorder`] method. How outcomes are persisted or displayed is up to the
//! implementation; [`MemoryRecorder`] keeps them in memory.

mod memory;
mod recorder;

pub use memory::MemoryRecorder;
pub use recorder::Recorder;
