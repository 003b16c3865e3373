mod call;
mod config;
mod error;
mod presence;
mod router;
mod signaling;
mod transport;

pub use call::*;
pub use config::*;
pub use error::*;
pub use presence::*;
pub use router::*;
pub use signaling::*;
pub use transport::*;
