use crate::error::DeliveryError;
use beacon_core::{ConnectionId, ServerEvent};
use std::time::Instant;
use tokio::sync::mpsc;

/// Cheaply cloneable reference to one live client channel.
///
/// The socket itself stays owned by the gateway task that created the handle;
/// the handle only carries the outbound queue feeding that socket's writer.
/// Once the writer goes away every `send` fails with
/// [`DeliveryError::ConnectionClosed`].
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    established_at: Instant,
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    pub fn new(tx: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            id: ConnectionId::new(),
            established_at: Instant::now(),
            tx,
        }
    }

    /// Handle plus the receiving end of its outbound queue.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn established_at(&self) -> Instant {
        self.established_at
    }

    pub fn send(&self, event: ServerEvent) -> Result<(), DeliveryError> {
        self.tx
            .send(event)
            .map_err(|_| DeliveryError::ConnectionClosed(self.id))
    }
}
