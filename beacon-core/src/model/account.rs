use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Durable account identity issued by the external authentication system.
///
/// The signaling core never generates or verifies these; it only compares
/// them. On the wire an identifier may arrive either as a JSON string or as an
/// unsigned integer, and both forms normalise to the same textual value.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(try_from = "RawAccountId", into = "String")]
pub struct AccountId(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("account identifier must not be empty")]
    Empty,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAccountId {
    Text(String),
    Integer(u64),
}

impl AccountId {
    pub fn new(id: impl Into<String>) -> Result<Self, AccountIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AccountIdError::Empty);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<RawAccountId> for AccountId {
    type Error = AccountIdError;

    fn try_from(raw: RawAccountId) -> Result<Self, Self::Error> {
        match raw {
            RawAccountId::Text(text) => Self::new(text),
            RawAccountId::Integer(n) => Self::new(n.to_string()),
        }
    }
}

impl From<u64> for AccountId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
