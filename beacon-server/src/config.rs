use std::time::Duration;

/// How long a call request may ring before the server gives up on it.
pub const DEFAULT_RING_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime knobs of the signaling core.
#[derive(Debug, Clone)]
pub struct SignalingConfig {
    /// `None` disables server-side expiry of unanswered call requests.
    pub ring_timeout: Option<Duration>,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            ring_timeout: Some(DEFAULT_RING_TIMEOUT),
        }
    }
}

impl SignalingConfig {
    pub fn with_ring_timeout(mut self, ring_timeout: Option<Duration>) -> Self {
        self.ring_timeout = ring_timeout.filter(|t| !t.is_zero());
        self
    }
}
