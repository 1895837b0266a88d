//! Scripted helpdesk assistant.
//!
//! Replies are chosen by keyword rules over the newest message, with a single
//! look back at the user's previous message when no rule matches.

mod intent;
mod responder;

pub use intent::Intent;
pub use responder::{classify, classify_intent};
