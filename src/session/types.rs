use crate::{
    assistant::{self, Intent},
    history::{Transcript, Turn},
};
use serde::{Deserialize, Serialize};

/// Form page currently open on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    PolicyInquiry,
    DeniedInquiry,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub page: Option<Page>,
    pub transcript: Transcript,
}

impl Session {
    pub fn new(id: String, email: String, full_name: String) -> Self {
        Self {
            id,
            email,
            full_name,
            page: None,
            transcript: Transcript::new(),
        }
    }

    /// Name shown in the home greeting: the part of the email before `@`.
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }

    /// Answers `message` and records both sides of the exchange.
    pub fn respond(&mut self, message: &str) -> Intent {
        let intent = assistant::classify_intent(message, self.transcript.turns());
        self.transcript.push(Turn::user(message));
        self.transcript.push(Turn::assistant(intent.reply()));
        intent
    }
}
