use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
pub struct CallId(pub Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a single call attempt. Everything except `Pending` is terminal.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum CallState {
    Pending,
    Accepted,
    Rejected,
    Abandoned,
    TimedOut,
}

impl CallState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, CallState::Pending)
    }
}

/// Reasons the server puts into the messages it synthesises itself.
pub mod reason {
    /// Target is not registered, or dropped while the call was ringing.
    pub const OFFLINE: &str = "offline";
    /// Nobody answered within the ring timeout.
    pub const TIMEOUT: &str = "timeout";
    /// Caller withdrew the request.
    pub const CANCELLED: &str = "cancelled";
    /// Caller dropped while the call was ringing.
    pub const CALLER_OFFLINE: &str = "caller-offline";
}
