pub mod assistant;
pub mod attachments;
pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod history;
pub mod server;
pub mod session;
pub mod storage;

pub use error::{Error, Result};
