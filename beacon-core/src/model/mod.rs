mod account;
mod call;
mod connection;
mod signaling;

pub use account::{AccountId, AccountIdError};
pub use call::{CallId, CallState, reason};
pub use connection::ConnectionId;
pub use signaling::{ClientEvent, NegotiationMessage, ServerEvent};
