use super::Intent;
use crate::history::{Role, Turn};

/// Top-level rules, checked in order. The first rule with a keyword contained
/// in the message wins.
const RULES: &[(Intent, &[&str])] = &[
    (Intent::Greeting, &["hi", "hello", "hey", "greetings"]),
    (Intent::Health, &["health", "symptom", "sick", "doctor"]),
    (Intent::Insurance, &["insurance", "policy", "denied", "claim"]),
    (Intent::Helpdesk, &["help", "support", "assist"]),
    (Intent::Farewell, &["bye", "goodbye", "exit", "log out"]),
];

/// Returns the reply for `input`, given every turn that came before it.
pub fn classify(input: &str, history: &[Turn]) -> &'static str {
    classify_intent(input, history).reply()
}

/// Picks the intent for `input`. `history` must not contain `input` itself.
pub fn classify_intent(input: &str, history: &[Turn]) -> Intent {
    let input = input.trim().to_lowercase();

    if let Some(intent) = match_rules(&input) {
        return intent;
    }

    follow_up(&input, history).unwrap_or(Intent::Clarify)
}

fn match_rules(input: &str) -> Option<Intent> {
    let (intent, _) = RULES
        .iter()
        .find(|(_, keywords)| contains_any(input, keywords))?;

    match intent {
        Intent::Insurance if input.contains("denied") => Some(Intent::Denial),
        intent => Some(*intent),
    }
}

// The last entry of `history` is the assistant's previous reply, so the
// user's previous message sits one position before it.
fn follow_up(input: &str, history: &[Turn]) -> Option<Intent> {
    let previous = history.len().checked_sub(2).map(|i| &history[i])?;
    let last_user_msg = match previous.role {
        Role::User => previous.text.to_lowercase(),
        Role::Assistant => String::new(),
    };

    if input.contains("more") && last_user_msg.contains("symptom") {
        return Some(Intent::SymptomFollowUp);
    }
    if input.contains("yes") && last_user_msg.contains("denied") {
        return Some(Intent::DenialFollowUp);
    }
    None
}

fn contains_any(input: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| input.contains(keyword))
}
