mod presence_registry;

pub use presence_registry::*;
