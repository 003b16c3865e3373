pub mod negotiation_tests;

use std::sync::Arc;
use std::time::Duration;

use beacon_server::{Dispatcher, SignalingConfig, SignalingService};
use tracing::Level;

use crate::utils::MockSignalingOutput;

/// Ring timeout used by tests that exercise expiry (paused clock).
pub const TEST_RING_TIMEOUT: Duration = Duration::from_secs(5);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Gateway with the server-side ring timeout switched off.
pub fn create_test_service() -> SignalingService {
    SignalingService::new(SignalingConfig::default().with_ring_timeout(None))
}

pub fn create_timed_service() -> SignalingService {
    SignalingService::new(SignalingConfig::default().with_ring_timeout(Some(TEST_RING_TIMEOUT)))
}

/// Dispatcher wired to a mock output instead of the registry.
pub fn create_mock_dispatcher() -> (Dispatcher, MockSignalingOutput) {
    let output = MockSignalingOutput::new();
    let config = SignalingConfig::default().with_ring_timeout(None);
    let dispatcher = Dispatcher::new(Arc::new(output.clone()), &config);
    (dispatcher, output)
}
