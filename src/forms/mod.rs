//! Submitted forms, their required-field checks and the outcomes derived from them.

mod types;

pub use types::*;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";
pub const ALL_FIELDS_MESSAGE: &str = "Please fill in all fields.";
