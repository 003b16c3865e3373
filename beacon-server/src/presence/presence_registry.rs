use crate::transport::ConnectionHandle;
use beacon_core::{AccountId, ConnectionId};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

struct RegistryInner {
    by_account: DashMap<AccountId, ConnectionHandle>,
    by_connection: DashMap<ConnectionId, AccountId>,
}

/// Process-wide association between account identifiers and live connections.
///
/// `by_account` is authoritative: every mutation of it is a single per-key
/// atomic operation, and removals are conditional on the connection id so a
/// stale close can never evict a newer registration. `by_connection` is a
/// secondary index that lets a closing connection find its account without
/// scanning.
#[derive(Clone)]
pub struct PresenceRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                by_account: DashMap::new(),
                by_connection: DashMap::new(),
            }),
        }
    }

    /// Makes `handle` the connection for `account`.
    ///
    /// Returns the handle that was superseded, if a different connection was
    /// registered for this account. The superseded connection is not closed.
    pub fn register(
        &self,
        account: AccountId,
        handle: ConnectionHandle,
    ) -> Option<ConnectionHandle> {
        let id = handle.id();

        // A connection answers to at most one account.
        if let Some(previous) = self.inner.by_connection.insert(id, account.clone())
            && previous != account
        {
            self.inner
                .by_account
                .remove_if(&previous, |_, current| current.id() == id);
            debug!(connection = %id, from = %previous, to = %account, "Connection re-registered");
        }

        let superseded = self
            .inner
            .by_account
            .insert(account.clone(), handle)
            .filter(|old| old.id() != id)?;

        self.inner
            .by_connection
            .remove_if(&superseded.id(), |_, owner| owner == &account);
        debug!(
            account = %account,
            old = %superseded.id(),
            new = %id,
            "Registration superseded"
        );

        Some(superseded)
    }

    pub fn resolve(&self, account: &AccountId) -> Option<ConnectionHandle> {
        self.inner
            .by_account
            .get(account)
            .map(|entry| entry.value().clone())
    }

    pub fn is_online(&self, account: &AccountId) -> bool {
        self.inner.by_account.contains_key(account)
    }

    /// Drops whatever account currently points at `connection`.
    ///
    /// Returns the account that was removed. `None` when the connection never
    /// registered, was already removed, or lost its account to a newer
    /// registration.
    pub fn remove(&self, connection: ConnectionId) -> Option<AccountId> {
        let (_, account) = self.inner.by_connection.remove(&connection)?;

        self.inner
            .by_account
            .remove_if(&account, |_, current| current.id() == connection)
            .map(|(account, _)| account)
    }

    pub fn len(&self) -> usize {
        self.inner.by_account.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.by_account.is_empty()
    }
}
