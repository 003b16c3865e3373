use crate::call::CallTracker;
use crate::config::SignalingConfig;
use crate::signaling::SignalingOutput;
use crate::transport::ConnectionHandle;
use beacon_core::{AccountId, CallId, CallState, NegotiationMessage, ServerEvent, reason};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What happened to one routed negotiation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routing {
    /// Handed to the connection registered for `to`.
    Delivered { to: AccountId },
    /// Target was unreachable; the sender got an `offline` rejection instead.
    RejectedOffline,
    /// Target was unreachable and the protocol says to stay silent.
    Dropped { to: AccountId },
}

struct DispatcherInner {
    output: Arc<dyn SignalingOutput>,
    calls: CallTracker,
    ring_timeout: Option<Duration>,
}

/// Routes call negotiation messages between registered accounts.
///
/// Every routing decision is made synchronously against the current presence
/// state; nothing is queued. Unreachable targets turn into protocol messages
/// (or silence), never into errors.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Dispatcher {
    pub fn new(output: Arc<dyn SignalingOutput>, config: &SignalingConfig) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                output,
                calls: CallTracker::new(),
                ring_timeout: config.ring_timeout,
            }),
        }
    }

    pub fn calls(&self) -> &CallTracker {
        &self.inner.calls
    }

    /// Routes one message received on `origin`, whose connection is
    /// registered as `sender`.
    pub async fn dispatch(
        &self,
        origin: &ConnectionHandle,
        sender: &AccountId,
        message: NegotiationMessage,
    ) -> Routing {
        match message {
            NegotiationMessage::CallRequest {
                from,
                to,
                caller_display,
            } => {
                if &from != sender {
                    warn!(
                        connection = %origin.id(),
                        account = %sender,
                        from = %from,
                        "call-request names a different caller than the registered account"
                    );
                }
                self.request(origin, from, to, caller_display).await
            }

            NegotiationMessage::CallAccepted { from, to } => {
                let (caller, responder) = response_roles(sender, from, to);
                self.inner
                    .calls
                    .settle(&caller, &responder, CallState::Accepted);
                let event = ServerEvent::CallAccepted { to: responder };
                self.relay_or_drop(caller, event).await
            }

            NegotiationMessage::CallRejected { from, to, reason } => {
                let (caller, responder) = response_roles(sender, from, to);
                self.inner
                    .calls
                    .settle(&caller, &responder, CallState::Rejected);
                let event = ServerEvent::CallRejected { reason };
                self.relay_or_drop(caller, event).await
            }

            NegotiationMessage::CallCancelled { from, to } => {
                let (caller, callee) = cancel_roles(sender, from, to);
                self.inner
                    .calls
                    .settle(&caller, &callee, CallState::Abandoned);
                let event = ServerEvent::CallCancelled {
                    from: caller,
                    reason: reason::CANCELLED.to_owned(),
                };
                self.relay_or_drop(callee, event).await
            }
        }
    }

    async fn request(
        &self,
        origin: &ConnectionHandle,
        from: AccountId,
        to: AccountId,
        caller_display: String,
    ) -> Routing {
        let id = self.inner.calls.open(from.clone(), to.clone());
        let event = ServerEvent::IncomingCall {
            from: from.clone(),
            caller_display,
        };

        match self.inner.output.send_to(&to, event).await {
            Ok(()) => {
                debug!(call = %id, from = %from, to = %to, "Call request delivered");
                self.arm_timer(&from, &to, id);
                Routing::Delivered { to }
            }
            Err(e) => {
                debug!(from = %from, to = %to, "Call target unreachable: {}", e);
                self.inner
                    .calls
                    .settle_if(&from, &to, id, CallState::Rejected);

                let rejection = ServerEvent::CallRejected {
                    reason: reason::OFFLINE.to_owned(),
                };
                if let Err(e) = origin.send(rejection) {
                    debug!(from = %from, "Caller went away before the rejection: {}", e);
                }
                Routing::RejectedOffline
            }
        }
    }

    async fn relay_or_drop(&self, to: AccountId, event: ServerEvent) -> Routing {
        match self.inner.output.send_to(&to, event).await {
            Ok(()) => {
                debug!(to = %to, "Negotiation message relayed");
                Routing::Delivered { to }
            }
            Err(e) => {
                debug!(to = %to, "Dropping negotiation message: {}", e);
                Routing::Dropped { to }
            }
        }
    }

    /// Tells the other side of every call that was ringing for `account`.
    /// The gateway calls this once the account's connection has left the
    /// registry. Nothing happens if the account is already registered again
    /// on another connection.
    pub async fn connection_closed(&self, account: &AccountId) {
        if self.inner.output.is_online(account).await {
            debug!(account = %account, "Account re-registered elsewhere, keeping its calls");
            return;
        }

        for attempt in self.inner.calls.abandon_involving(account) {
            info!(
                call = %attempt.id,
                caller = %attempt.caller,
                callee = %attempt.callee,
                "Call attempt abandoned by disconnect"
            );

            let (to, event) = if &attempt.caller == account {
                let event = ServerEvent::CallCancelled {
                    from: attempt.caller,
                    reason: reason::CALLER_OFFLINE.to_owned(),
                };
                (attempt.callee, event)
            } else {
                let event = ServerEvent::CallRejected {
                    reason: reason::OFFLINE.to_owned(),
                };
                (attempt.caller, event)
            };
            self.relay_or_drop(to, event).await;
        }
    }

    fn arm_timer(&self, caller: &AccountId, callee: &AccountId, id: CallId) {
        let Some(ring_timeout) = self.inner.ring_timeout else {
            return;
        };

        let dispatcher = self.clone();
        let (timer_caller, timer_callee) = (caller.clone(), callee.clone());
        let timer = tokio::spawn(async move {
            tokio::time::sleep(ring_timeout).await;
            dispatcher.expire(timer_caller, timer_callee, id).await;
        });

        self.inner
            .calls
            .arm(caller, callee, id, timer.abort_handle());
    }

    async fn expire(&self, caller: AccountId, callee: AccountId, id: CallId) {
        let Some(attempt) = self
            .inner
            .calls
            .settle_if(&caller, &callee, id, CallState::TimedOut)
        else {
            return;
        };
        info!(call = %attempt.id, caller = %caller, callee = %callee, "Call attempt timed out");

        let to_caller = ServerEvent::CallRejected {
            reason: reason::TIMEOUT.to_owned(),
        };
        let to_callee = ServerEvent::CallCancelled {
            from: caller.clone(),
            reason: reason::TIMEOUT.to_owned(),
        };
        self.relay_or_drop(caller, to_caller).await;
        self.relay_or_drop(callee, to_callee).await;
    }
}

/// `(caller, responder)` for an accept or reject sent by `sender`.
///
/// Clients name the roles either as `{from: caller, to: callee}` or as
/// `{from: callee, to: caller}`; whichever side is not the sender is the
/// caller. A sender matching neither side gets the first form.
fn response_roles(sender: &AccountId, from: AccountId, to: AccountId) -> (AccountId, AccountId) {
    if sender == &from {
        (to, from)
    } else {
        (from, to)
    }
}

/// `(caller, callee)` for a cancel sent by `sender`, who is the caller.
///
/// The callee is the counterpart of the sender: `to` when the sender is
/// `from`, `from` otherwise.
fn cancel_roles(sender: &AccountId, from: AccountId, to: AccountId) -> (AccountId, AccountId) {
    if sender == &from {
        (from, to)
    } else {
        (to, from)
    }
}
