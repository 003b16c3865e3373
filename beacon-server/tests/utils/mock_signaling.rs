use async_trait::async_trait;
use beacon_core::{AccountId, ServerEvent};
use beacon_server::{DeliveryError, SignalingOutput};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock SignalingOutput: a fixed set of online accounts, every delivery recorded.
#[derive(Clone, Default)]
pub struct MockSignalingOutput {
    online: Arc<Mutex<HashSet<AccountId>>>,
    /// All delivered events (for verification).
    deliveries: Arc<Mutex<Vec<(AccountId, ServerEvent)>>>,
}

impl MockSignalingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_online(&self, account: &AccountId) {
        self.online.lock().await.insert(account.clone());
    }

    pub async fn set_offline(&self, account: &AccountId) {
        self.online.lock().await.remove(account);
    }

    pub async fn deliveries(&self) -> Vec<(AccountId, ServerEvent)> {
        self.deliveries.lock().await.clone()
    }

    /// Events delivered to a specific account, in order.
    pub async fn deliveries_to(&self, account: &AccountId) -> Vec<ServerEvent> {
        self.deliveries
            .lock()
            .await
            .iter()
            .filter(|(to, _)| to == account)
            .map(|(_, event)| event.clone())
            .collect()
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn send_to(&self, account: &AccountId, event: ServerEvent) -> Result<(), DeliveryError> {
        tracing::debug!("[MockSignaling] send_to {}", account);

        if !self.online.lock().await.contains(account) {
            return Err(DeliveryError::Offline(account.clone()));
        }
        self.deliveries.lock().await.push((account.clone(), event));
        Ok(())
    }

    async fn is_online(&self, account: &AccountId) -> bool {
        self.online.lock().await.contains(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::account;

    #[tokio::test]
    async fn test_mock_signaling_rejects_offline_accounts() {
        let signaling = MockSignalingOutput::new();
        let event = ServerEvent::CallRejected {
            reason: "busy".into(),
        };

        let result = signaling.send_to(&account("u1"), event).await;

        assert_eq!(result, Err(DeliveryError::Offline(account("u1"))));
        assert!(signaling.deliveries().await.is_empty());
    }

    #[tokio::test]
    async fn test_mock_signaling_captures_deliveries() {
        let signaling = MockSignalingOutput::new();
        signaling.set_online(&account("u1")).await;
        let event = ServerEvent::CallAccepted { to: account("u2") };

        signaling.send_to(&account("u1"), event.clone()).await.unwrap();

        assert_eq!(signaling.deliveries_to(&account("u1")).await, vec![event]);
    }
}
