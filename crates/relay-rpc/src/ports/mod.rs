//! Port definitions for the request correlation layer.

pub mod outbound;

pub use outbound::{IdGenerator, TimerCallback, TimerHandle, TimerService};
