use crate::call::Dispatcher;
use crate::config::SignalingConfig;
use crate::error::DeliveryError;
use crate::presence::PresenceRegistry;
use crate::signaling::{Connection, SignalingOutput};
use crate::transport::ConnectionHandle;
use async_trait::async_trait;
use beacon_core::{AccountId, ServerEvent};
use std::sync::Arc;

struct SignalingInner {
    registry: PresenceRegistry,
    dispatcher: Dispatcher,
}

/// The connection gateway: shared by every socket task, it hands out
/// [`Connection`]s and owns the registry and dispatcher they talk to.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(config: SignalingConfig) -> Self {
        let registry = PresenceRegistry::new();
        let dispatcher = Dispatcher::new(Arc::new(registry.clone()), &config);

        Self {
            inner: Arc::new(SignalingInner {
                registry,
                dispatcher,
            }),
        }
    }

    pub fn registry(&self) -> &PresenceRegistry {
        &self.inner.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    /// Wraps a freshly accepted channel. The connection starts out
    /// unregistered.
    pub fn connect(&self, handle: ConnectionHandle) -> Connection {
        Connection::new(handle, self.clone())
    }
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new(SignalingConfig::default())
    }
}

#[async_trait]
impl SignalingOutput for PresenceRegistry {
    async fn send_to(&self, account: &AccountId, event: ServerEvent) -> Result<(), DeliveryError> {
        let handle = self
            .resolve(account)
            .ok_or_else(|| DeliveryError::Offline(account.clone()))?;
        handle.send(event)
    }

    async fn is_online(&self, account: &AccountId) -> bool {
        PresenceRegistry::is_online(self, account)
    }
}
