//! Settlement state of a request unit.

use std::fmt;

/// Lifecycle of a request.
///
/// ```text
///            response
///   Pending ───────────► Resolved
///      │
///      │ error / timeout / cancel
///      ▼
///   Rejected
/// ```
///
/// Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    Pending,
    Resolved,
    Rejected,
}

impl RequestState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestState::Pending)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::Pending => "pending",
            RequestState::Resolved => "resolved",
            RequestState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}
