//! Adapters implementing the outbound ports.

pub mod ids;
pub mod timer;

pub use ids::{SequentialIdGenerator, UuidIdGenerator};
pub use timer::{TimerError, TokioTimerService};
