mod dbs;
mod deepseek;
mod error;
mod handlers;

pub use crate::dbs::{Database, DbError, DbResult, sqlite::SqliteDatabase};
pub use crate::deepseek::DeepseekClient;

use crate::deepseek::relay_completion;
use crate::handlers::{create_chat, get_chat, list_chats, upload_file};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub deepseek: Arc<DeepseekClient>,
}

/// Mount the API routes on `router` with an explicit state, leaving storage
/// and provider wiring to the caller. `init` is the production entry point.
pub fn routes(router: Router<AppState>, state: AppState) -> Router<()> {
    router
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/chats", get(list_chats))
        .route("/api/chats/new", post(create_chat))
        .route("/api/chat/{chat_id}", get(get_chat))
        .route("/api/chat", post(relay_completion))
        .route("/api/upload", post(upload_file))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Open the chat store at `database_url`, build the DeepSeek client from the
/// environment, and wire the API routes.
pub async fn init(router: Router<AppState>, database_url: &str) -> Result<Router<()>, DbError> {
    let db = SqliteDatabase::connect(database_url).await?;
    let state = AppState {
        db: Arc::new(db),
        deepseek: Arc::new(DeepseekClient::from_env()),
    };
    Ok(routes(router, state))
}
