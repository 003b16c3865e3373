use beacon_core::{AccountId, ConnectionId};
use thiserror::Error;

/// Why an outbound event could not be handed to a client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("account {0} is not connected")]
    Offline(AccountId),

    #[error("connection {0} is closed")]
    ConnectionClosed(ConnectionId),
}
