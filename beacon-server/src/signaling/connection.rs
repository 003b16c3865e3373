use crate::call::Routing;
use crate::signaling::SignalingService;
use crate::transport::ConnectionHandle;
use beacon_core::{AccountId, ClientEvent, ConnectionId, ServerEvent};
use std::mem;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Channel open, no account yet.
    Connected,
    Registered(AccountId),
    /// Terminal. Nothing goes in or out any more.
    Closed,
}

/// Gateway-side state of one client channel.
///
/// Inbound events for a connection are fed through `&mut self`, so they are
/// processed strictly in arrival order.
pub struct Connection {
    handle: ConnectionHandle,
    state: ConnectionState,
    service: SignalingService,
}

impl Connection {
    pub(crate) fn new(handle: ConnectionHandle, service: SignalingService) -> Self {
        Self {
            handle,
            state: ConnectionState::Connected,
            service,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.handle.id()
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Parses one text frame and handles it. Malformed frames are logged and
    /// dropped; they never end the connection.
    pub async fn handle_text(&mut self, text: &str) -> Option<Routing> {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => self.handle_event(event).await,
            Err(e) => {
                warn!(connection = %self.id(), "Invalid ClientEvent: {}", e);
                None
            }
        }
    }

    pub async fn handle_event(&mut self, event: ClientEvent) -> Option<Routing> {
        if let ClientEvent::Register { account_id } = event {
            self.register(account_id).await;
            return None;
        }

        let sender = match &self.state {
            ConnectionState::Registered(account) => account.clone(),
            ConnectionState::Connected => {
                warn!(connection = %self.id(), "Negotiation event before register, discarding");
                return None;
            }
            ConnectionState::Closed => return None,
        };

        let message = event.into_negotiation()?;
        debug!(connection = %self.id(), account = %sender, kind = message.kind(), "Inbound negotiation message");

        Some(
            self.service
                .dispatcher()
                .dispatch(&self.handle, &sender, message)
                .await,
        )
    }

    async fn register(&mut self, account: AccountId) {
        let previous = match &self.state {
            ConnectionState::Closed => return,
            ConnectionState::Connected => None,
            ConnectionState::Registered(previous) => Some(previous.clone()),
        };

        let registry = self.service.registry();
        if let Some(old) = registry.register(account.clone(), self.handle.clone()) {
            info!(account = %account, old = %old.id(), "Account moved to a new connection");
        }
        info!(connection = %self.id(), account = %account, "Registered");

        let ack = ServerEvent::Registered {
            account_id: account.clone(),
            connection_id: self.id(),
        };
        if let Err(e) = self.handle.send(ack) {
            debug!(connection = %self.id(), "Could not acknowledge register: {}", e);
        }
        self.state = ConnectionState::Registered(account.clone());

        // Switching accounts on one connection takes the old account offline.
        if let Some(previous) = previous.filter(|p| p != &account) {
            self.service.dispatcher().connection_closed(&previous).await;
        }
    }

    /// Leaves the registry and settles whatever was ringing for this
    /// connection's account. Safe to call more than once.
    pub async fn close(&mut self) {
        if mem::replace(&mut self.state, ConnectionState::Closed) == ConnectionState::Closed {
            return;
        }

        match self.service.registry().remove(self.id()) {
            Some(account) => {
                info!(
                    connection = %self.id(),
                    account = %account,
                    connected_for = ?self.handle.established_at().elapsed(),
                    "Account went offline"
                );
                self.service.dispatcher().connection_closed(&account).await;
            }
            None => debug!(connection = %self.id(), "Closed without a live registration"),
        }
    }
}
