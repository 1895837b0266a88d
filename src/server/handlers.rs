use super::{
    extract::{ApiError, ApiJson},
    types::*,
};
use crate::{
    Error, Result,
    attachments::{self, AttachmentStore},
    auth::PasswordHasher,
    forms::{DeniedInquiryForm, LoginForm, PolicyInquiryForm, SignupForm},
    session::{Page, Session, SessionStore},
    storage::{DeniedInquiry, HelpdeskStore, PolicyInquiry, User},
};
use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub store: HelpdeskStore,
    pub sessions: SessionStore,
    pub attachments: Arc<dyn AttachmentStore>,
    pub hasher: PasswordHasher,
}

type ApiResult<T> = std::result::Result<T, ApiError>;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<SignupForm>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    form.check().map_err(error_response)?;

    let password_hash = state.hasher.hash(&form.password).await.map_err(error_response)?;
    let patient_id = form.patient_id.clone().filter(|id| !id.is_empty());
    let user = User::new(form.full_name.clone(), form.email.clone(), patient_id, password_hash);

    state.store.insert_user(&user).await.map_err(error_response)?;
    info!("Account created for {}", form.email);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Account created for {}! Please log in.", form.full_name),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginForm>,
) -> ApiResult<Json<LoginResponse>> {
    form.check().map_err(error_response)?;

    let user = authenticate(&state, &form).await.map_err(error_response)?;
    let session_id = state
        .sessions
        .create(&user.email, &user.full_name)
        .map_err(error_response)?;

    Ok(Json(LoginResponse {
        session_id,
        message: format!("Welcome back, {}!", user.full_name),
        full_name: user.full_name,
    }))
}

async fn authenticate(state: &AppState, form: &LoginForm) -> Result<User> {
    let Some(user) = state.store.find_user_by_email(&form.email).await? else {
        warn!("Login attempt for unknown email");
        return Err(Error::InvalidCredentials);
    };
    if !state.hasher.verify(&form.password, &user.password_hash).await? {
        warn!("Login attempt with wrong password for {}", form.email);
        return Err(Error::InvalidCredentials);
    }
    Ok(user)
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let id = session_id(&headers).map_err(error_response)?;
    state.sessions.remove(id).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<HomeResponse>> {
    let session = current_session(&state, &headers).map_err(error_response)?;
    Ok(Json(home_view(&session)))
}

pub async fn set_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<PageRequest>,
) -> ApiResult<Json<HomeResponse>> {
    let id = session_id(&headers).map_err(error_response)?;
    state
        .sessions
        .set_page(id, request.page)
        .map_err(error_response)?;
    let session = state.sessions.get(id).map_err(error_response)?;
    Ok(Json(home_view(&session)))
}

fn home_view(session: &Session) -> HomeResponse {
    HomeResponse {
        greeting: format!("Hi, {}!", session.display_name()),
        page: session.page,
        options: [Page::PolicyInquiry, Page::DeniedInquiry],
    }
}

pub async fn submit_policy_inquiry(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(form): ApiJson<PolicyInquiryForm>,
) -> ApiResult<(StatusCode, Json<PolicyInquiryResponse>)> {
    current_session(&state, &headers).map_err(error_response)?;
    form.check().map_err(error_response)?;

    let inquiry = PolicyInquiry::from(&form);
    let id = state
        .store
        .insert_policy_inquiry(&inquiry)
        .await
        .map_err(error_response)?;
    info!(
        "Policy inquiry {} stored, recommended {}",
        id, inquiry.recommended_policy
    );

    Ok((
        StatusCode::CREATED,
        Json(PolicyInquiryResponse {
            id,
            recommended_policy: inquiry.recommended_policy,
        }),
    ))
}

pub async fn submit_denied_inquiry(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<DeniedInquiryResponse>)> {
    current_session(&state, &headers).map_err(error_response)?;

    let (form, document) = read_denied_form(multipart).await.map_err(error_response)?;
    form.check().map_err(error_response)?;

    let inquiry = store_denied_inquiry(&state, &form, document)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(DeniedInquiryResponse {
            id: inquiry.id.unwrap_or_default(),
            denial_reason: inquiry.denial_reason,
            document_path: inquiry.document_path,
        }),
    ))
}

/// Writes the attachment, then the row. A failed insert removes the attachment
/// again so the same submission can be retried.
async fn store_denied_inquiry(
    state: &AppState,
    form: &DeniedInquiryForm,
    document: Option<(String, Vec<u8>)>,
) -> Result<DeniedInquiry> {
    let mut stored_key = None;
    let document_path = match document {
        Some((file_name, bytes)) => {
            let key = attachments::attachment_key(&form.patient_id, &form.policy_id, &file_name)?;
            let path = state.attachments.put(&key, &bytes).await?;
            info!("Document '{}' uploaded to {}", file_name, path);
            stored_key = Some(key);
            Some(path)
        }
        None => None,
    };

    let mut inquiry = DeniedInquiry::new(form, form.denial_reason(), document_path);
    match state.store.insert_denied_inquiry(&inquiry).await {
        Ok(id) => {
            info!("Denied inquiry {} stored: {}", id, inquiry.denial_reason);
            inquiry.id = Some(id);
            Ok(inquiry)
        }
        Err(e) => {
            if let Some(key) = stored_key {
                if let Err(remove_err) = state.attachments.remove(&key).await {
                    warn!("Failed to remove attachment {}: {}", key, remove_err);
                }
            }
            Err(e)
        }
    }
}

async fn read_denied_form(
    mut multipart: Multipart,
) -> Result<(DeniedInquiryForm, Option<(String, Vec<u8>)>)> {
    let mut form = DeniedInquiryForm::default();
    let mut document = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "patient_name" => form.patient_name = field.text().await?,
            "patient_id" => form.patient_id = field.text().await?,
            "policy_id" => form.policy_id = field.text().await?,
            "policy_name" => form.policy_name = field.text().await?,
            "document" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was picked.
                if !file_name.is_empty() {
                    document = Some((file_name, bytes.to_vec()));
                }
            }
            other => debug!("Ignoring unknown form field: {}", other),
        }
    }

    Ok((form, document))
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let id = session_id(&headers).map_err(error_response)?;
    if request.message.is_empty() {
        return Err(error_response(Error::validation("Message must not be empty.")));
    }

    let intent = state
        .sessions
        .chat(id, &request.message)
        .map_err(error_response)?;
    debug!("Chat message classified as {}", intent);

    Ok(Json(ChatResponse {
        reply: intent.reply().to_string(),
        intent,
    }))
}

pub async fn transcript(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<TranscriptResponse>> {
    let id = session_id(&headers).map_err(error_response)?;
    let turns = state.sessions.transcript(id).map_err(error_response)?;
    Ok(Json(TranscriptResponse { turns }))
}

fn session_id(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(Error::Unauthorized)
}

fn current_session(state: &AppState, headers: &HeaderMap) -> Result<Session> {
    state.sessions.get(session_id(headers)?)
}

fn error_response(e: Error) -> ApiError {
    let status = match &e {
        Error::Validation(_) | Error::UnsupportedAttachment { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        Error::PasswordMismatch | Error::Multipart(_) => StatusCode::BAD_REQUEST,
        Error::EmailTaken | Error::AttachmentExists { .. } => StatusCode::CONFLICT,
        Error::InvalidCredentials | Error::Unauthorized => StatusCode::UNAUTHORIZED,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Request failed: {}", e);
    } else {
        debug!("Request rejected ({}): {}", status, e);
    }

    ApiError {
        status,
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attachments::LocalAttachmentStore, auth};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    async fn state(dir: &TempDir) -> AppState {
        AppState {
            store: HelpdeskStore::new(":memory:").await.unwrap(),
            sessions: SessionStore::new(),
            attachments: Arc::new(LocalAttachmentStore::new(dir.path()).await.unwrap()),
            hasher: PasswordHasher::new(auth::MIN_COST).unwrap(),
        }
    }

    fn form() -> DeniedInquiryForm {
        DeniedInquiryForm {
            patient_name: "Jane Doe".to_string(),
            patient_id: "12345".to_string(),
            policy_id: "POL-7".to_string(),
            policy_name: "Family cover".to_string(),
        }
    }

    fn letter() -> Option<(String, Vec<u8>)> {
        Some(("letter.pdf".to_string(), b"%PDF-1.4".to_vec()))
    }

    #[tokio::test]
    async fn test_failed_insert_removes_attachment() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;
        let file = dir.path().join("12345_POL-7_letter.pdf");

        state
            .store
            .execute_raw("ALTER TABLE denied_inquiries RENAME TO denied_inquiries_offline")
            .await
            .unwrap();
        let failed = store_denied_inquiry(&state, &form(), letter()).await;
        assert!(matches!(failed, Err(Error::Database(_))));
        assert!(!file.exists());

        state
            .store
            .execute_raw("ALTER TABLE denied_inquiries_offline RENAME TO denied_inquiries")
            .await
            .unwrap();
        let inquiry = store_denied_inquiry(&state, &form(), letter()).await.unwrap();

        assert!(inquiry.id.is_some());
        assert_eq!(inquiry.denial_reason, "Policy expired");
        assert_eq!(
            inquiry.document_path.as_deref(),
            Some(file.to_string_lossy().as_ref())
        );
        assert_eq!(tokio::fs::read(&file).await.unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_conflicting_attachment_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        store_denied_inquiry(&state, &form(), letter()).await.unwrap();
        let second = store_denied_inquiry(&state, &form(), letter()).await;

        assert!(matches!(second, Err(Error::AttachmentExists { .. })));
        assert!(dir.path().join("12345_POL-7_letter.pdf").exists());
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_response(Error::validation("x")).status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(error_response(Error::EmailTaken).status, StatusCode::CONFLICT);
        assert_eq!(error_response(Error::Unauthorized).status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            error_response(Error::internal("boom")).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
