use crate::{assistant::Intent, history::Turn, session::Page};
use serde::{Deserialize, Serialize};

/// Header carrying the id returned by `/login`.
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session_id: String,
    pub full_name: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub greeting: String,
    pub page: Option<Page>,
    pub options: [Page; 2],
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: Option<Page>,
}

#[derive(Debug, Serialize)]
pub struct PolicyInquiryResponse {
    pub id: i64,
    pub recommended_policy: String,
}

#[derive(Debug, Serialize)]
pub struct DeniedInquiryResponse {
    pub id: i64,
    pub denial_reason: String,
    pub document_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub intent: Intent,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub turns: Vec<Turn>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
