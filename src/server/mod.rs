pub mod handlers;
mod extract;
mod types;

pub use extract::{ApiError, ApiJson};
pub use handlers::AppState;
pub use types::*;

use crate::{
    Result, attachments::LocalAttachmentStore, auth::PasswordHasher, config::Config,
    session::SessionStore, storage::HelpdeskStore,
};
use axum::{
    Router,
    routing::{get, post, put},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

impl AppState {
    pub async fn from_config(config: &Config) -> Result<Self> {
        let db_path = std::env::var("HELPDESK_DB_PATH")
            .unwrap_or_else(|_| config.storage.database_path.clone());

        Ok(Self {
            store: HelpdeskStore::new(&db_path).await?,
            sessions: SessionStore::new(),
            attachments: Arc::new(LocalAttachmentStore::new(&config.storage.attachments_dir).await?),
            hasher: PasswordHasher::from_config(&config.auth)?,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/home", get(handlers::home))
        .route("/home/page", put(handlers::set_page))
        .route("/inquiries/policy", post(handlers::submit_policy_inquiry))
        .route("/inquiries/denied", post(handlers::submit_denied_inquiry))
        .route("/chat", get(handlers::transcript).post(handlers::chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let app_state = AppState::from_config(&config).await?;
    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
