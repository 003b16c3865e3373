use beacon_core::{AccountId, CallId, CallState};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::AbortHandle;

/// A call attempt as seen when it leaves (or is about to leave) the ringing
/// phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallAttempt {
    pub id: CallId,
    pub caller: AccountId,
    pub callee: AccountId,
    pub state: CallState,
    pub started_at: Instant,
}

struct PendingCall {
    id: CallId,
    started_at: Instant,
    timer: Option<AbortHandle>,
}

impl PendingCall {
    fn disarm(&self) {
        if let Some(timer) = &self.timer {
            timer.abort();
        }
    }
}

type CallKey = (AccountId, AccountId);

/// Ringing call attempts, keyed by `(caller, callee)`.
///
/// Only `Pending` attempts are stored. Every transition out of `Pending`
/// removes the entry and hands the finished [`CallAttempt`] back.
#[derive(Clone, Default)]
pub struct CallTracker {
    pending: Arc<DashMap<CallKey, PendingCall>>,
}

impl CallTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts ringing. A still-pending attempt for the same pair is replaced
    /// and its timer disarmed.
    pub fn open(&self, caller: AccountId, callee: AccountId) -> CallId {
        let id = CallId::new();
        let pending = PendingCall {
            id,
            started_at: Instant::now(),
            timer: None,
        };

        if let Some(replaced) = self.pending.insert((caller, callee), pending) {
            replaced.disarm();
        }

        id
    }

    /// Attaches the expiry timer for attempt `id`. If the attempt already
    /// finished the timer is aborted straight away.
    pub fn arm(&self, caller: &AccountId, callee: &AccountId, id: CallId, timer: AbortHandle) {
        let key = (caller.clone(), callee.clone());
        match self.pending.get_mut(&key) {
            Some(mut entry) if entry.id == id => entry.timer = Some(timer),
            _ => timer.abort(),
        }
    }

    /// Moves the pending attempt for this pair into a terminal state.
    pub fn settle(
        &self,
        caller: &AccountId,
        callee: &AccountId,
        state: CallState,
    ) -> Option<CallAttempt> {
        debug_assert!(state.is_terminal(), "settling into non-terminal {state:?}");
        let key = (caller.clone(), callee.clone());
        let ((caller, callee), pending) = self.pending.remove(&key)?;
        pending.disarm();

        Some(CallAttempt {
            id: pending.id,
            caller,
            callee,
            state,
            started_at: pending.started_at,
        })
    }

    /// Like [`settle`](Self::settle), but only if the pending attempt for this
    /// pair is still attempt `id`. Used by expiry timers, which must not abort
    /// themselves, and to discard an attempt whose request never got through.
    pub fn settle_if(
        &self,
        caller: &AccountId,
        callee: &AccountId,
        id: CallId,
        state: CallState,
    ) -> Option<CallAttempt> {
        debug_assert!(state.is_terminal(), "settling into non-terminal {state:?}");
        let key = (caller.clone(), callee.clone());
        let ((caller, callee), pending) = self.pending.remove_if(&key, |_, p| p.id == id)?;

        Some(CallAttempt {
            id: pending.id,
            caller,
            callee,
            state,
            started_at: pending.started_at,
        })
    }

    /// Abandons every attempt in which `account` is caller or callee.
    pub fn abandon_involving(&self, account: &AccountId) -> Vec<CallAttempt> {
        let keys: Vec<CallKey> = self
            .pending
            .iter()
            .filter(|entry| {
                let (caller, callee) = entry.key();
                caller == account || callee == account
            })
            .map(|entry| entry.key().clone())
            .collect();

        keys.into_iter()
            .filter_map(|(caller, callee)| self.settle(&caller, &callee, CallState::Abandoned))
            .collect()
    }

    pub fn is_pending(&self, caller: &AccountId, callee: &AccountId) -> bool {
        self.pending
            .contains_key(&(caller.clone(), callee.clone()))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
