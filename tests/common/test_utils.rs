use super::mocks::MockAttachmentStore;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use patient_helpdesk::{
    auth::{self, PasswordHasher},
    server::{self, AppState, SESSION_HEADER},
    session::SessionStore,
    storage::HelpdeskStore,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

pub const BOUNDARY: &str = "helpdesk-test-boundary";

/// Router over an in-memory database and attachment store.
pub async fn create_test_app() -> (Router, MockAttachmentStore) {
    let attachments = MockAttachmentStore::new();
    let state = AppState {
        store: HelpdeskStore::new(":memory:").await.unwrap(),
        sessions: SessionStore::new(),
        attachments: Arc::new(attachments.clone()),
        hasher: PasswordHasher::new(auth::MIN_COST).unwrap(),
    };
    (server::router(state), attachments)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    read_json(response).await
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, session: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    builder.body(Body::empty()).unwrap()
}

/// Builds a `multipart/form-data` body with text fields and an optional `document` file.
pub fn multipart_request(
    uri: &str,
    session: Option<&str>,
    fields: &[(&str, &str)],
    document: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = document {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"document\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn signup_body(email: &str) -> Value {
    json!({
        "full_name": "Jane Doe",
        "email": email,
        "patient_id": "12345",
        "password": "s3cret",
        "confirm_password": "s3cret"
    })
}

/// Registers `email` and logs in, returning the session id.
pub async fn signed_in(app: &Router, email: &str) -> String {
    let (status, _) = send(app, json_request("POST", "/signup", None, signup_body(email))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/login",
            None,
            json!({ "email": email, "password": "s3cret" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["session_id"].as_str().unwrap().to_string()
}

pub fn denied_fields(patient_id: &str) -> Vec<(&'static str, &str)> {
    vec![
        ("patient_name", "Jane Doe"),
        ("patient_id", patient_id),
        ("policy_id", "POL-7"),
        ("policy_name", "Family cover"),
    ]
}
