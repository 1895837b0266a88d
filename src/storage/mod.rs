mod store;
mod types;

pub use store::HelpdeskStore;
pub use types::*;
