use crate::model::account::AccountId;
use crate::model::connection::ConnectionId;
use serde::{Deserialize, Serialize};

/// Events a client sends over its signaling connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    Register {
        account_id: AccountId,
    },
    CallRequest {
        from: AccountId,
        to: AccountId,
        caller_display: String,
    },
    CallAccepted {
        from: AccountId,
        to: AccountId,
    },
    CallRejected {
        from: AccountId,
        to: AccountId,
        reason: String,
    },
    CallCancelled {
        from: AccountId,
        to: AccountId,
    },
}

impl ClientEvent {
    /// Splits off the call negotiation part of the vocabulary. `register` is
    /// handled by the gateway itself and yields `None`.
    pub fn into_negotiation(self) -> Option<NegotiationMessage> {
        match self {
            ClientEvent::Register { .. } => None,
            ClientEvent::CallRequest {
                from,
                to,
                caller_display,
            } => Some(NegotiationMessage::CallRequest {
                from,
                to,
                caller_display,
            }),
            ClientEvent::CallAccepted { from, to } => {
                Some(NegotiationMessage::CallAccepted { from, to })
            }
            ClientEvent::CallRejected { from, to, reason } => {
                Some(NegotiationMessage::CallRejected { from, to, reason })
            }
            ClientEvent::CallCancelled { from, to } => {
                Some(NegotiationMessage::CallCancelled { from, to })
            }
        }
    }
}

/// A call negotiation message as routed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationMessage {
    CallRequest {
        from: AccountId,
        to: AccountId,
        caller_display: String,
    },
    CallAccepted {
        from: AccountId,
        to: AccountId,
    },
    CallRejected {
        from: AccountId,
        to: AccountId,
        reason: String,
    },
    CallCancelled {
        from: AccountId,
        to: AccountId,
    },
}

impl NegotiationMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            NegotiationMessage::CallRequest { .. } => "call-request",
            NegotiationMessage::CallAccepted { .. } => "call-accepted",
            NegotiationMessage::CallRejected { .. } => "call-rejected",
            NegotiationMessage::CallCancelled { .. } => "call-cancelled",
        }
    }
}

/// Events the server delivers to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    Registered {
        account_id: AccountId,
        connection_id: ConnectionId,
    },
    IncomingCall {
        from: AccountId,
        caller_display: String,
    },
    CallAccepted {
        to: AccountId,
    },
    CallRejected {
        reason: String,
    },
    CallCancelled {
        from: AccountId,
        reason: String,
    },
}
