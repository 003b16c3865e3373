use crate::error::DeliveryError;
use beacon_core::{AccountId, ServerEvent};
use async_trait::async_trait;

/// Outbound side of the gateway as seen by the dispatcher: delivery to whatever
/// connection an account is currently registered on.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver an event to the connection currently registered for `account`.
    ///
    /// Fails with [`DeliveryError::Offline`] when nobody is registered under
    /// that account. Nothing is queued for later.
    async fn send_to(&self, account: &AccountId, event: ServerEvent) -> Result<(), DeliveryError>;

    /// Whether `account` currently has a registered connection.
    async fn is_online(&self, account: &AccountId) -> bool;
}
