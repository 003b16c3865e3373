mod call_tracker;
mod dispatcher;

pub use call_tracker::*;
pub use dispatcher::*;
