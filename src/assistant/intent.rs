use serde::{Deserialize, Serialize};
use std::fmt;

/// Reply category chosen for one user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Health,
    /// Insurance talk that mentions a denial.
    Denial,
    Insurance,
    Helpdesk,
    Farewell,
    /// "more" after the user described a symptom.
    SymptomFollowUp,
    /// "yes" after the user mentioned a denial.
    DenialFollowUp,
    Clarify,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Health => "health",
            Self::Denial => "denial",
            Self::Insurance => "insurance",
            Self::Helpdesk => "helpdesk",
            Self::Farewell => "farewell",
            Self::SymptomFollowUp => "symptom_follow_up",
            Self::DenialFollowUp => "denial_follow_up",
            Self::Clarify => "clarify",
        }
    }

    pub fn reply(&self) -> &'static str {
        match self {
            Self::Greeting => {
                "Greetings, human! I’m your trusty Patient Assistant, here to help with a dash of cosmic curiosity. How can I assist you today? 🌌"
            }
            Self::Health => {
                "Sounds like you’re pondering the mysteries of the human body! Tell me more—symptoms, questions, or something specific? I’ll do my best to enlighten you! 🩺"
            }
            Self::Denial => {
                "Oh no, a denial! Fear not, I’m here to help. Want to check a denied inquiry or need tips on what might’ve gone wrong? 📜"
            }
            Self::Insurance => {
                "Insurance, huh? A labyrinth of paperwork! Are you asking about a policy, a claim, or something else? Let’s unravel it together! 💸"
            }
            Self::Helpdesk => {
                "Help is my middle name—well, not really, but I’m here for it! What’s on your mind? Forms, inquiries, or just a chat? 🤝"
            }
            Self::Farewell => {
                "Farewell, traveler! If you need me again, I’ll be floating in the digital ether. Stay curious! 🚀"
            }
            Self::SymptomFollowUp => {
                "More symptoms, eh? Spill the beans—what else are you feeling? I’ll try to connect the dots! 🔍"
            }
            Self::DenialFollowUp => {
                "Alright, let’s dig into that denial. Got a patient ID or policy ID handy? I can guide you through the form! 🕵️‍♂️"
            }
            Self::Clarify => {
                "Hmm, I’m picking up signals, but I need a bit more to lock on! Could you clarify—health, insurance, or something else? I’m all ears (or rather, all text)! 🌟"
            }
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
