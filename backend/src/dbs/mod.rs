use async_trait::async_trait;
use shared::models::{Chat, ChatSummary};
use thiserror::Error;
use uuid::Uuid;

pub mod sqlite;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Persistence seam for the chat store: one row per chat, keyed by id.
#[async_trait]
pub trait Database: Send + Sync {
    /// Write or overwrite a chat row. The stored `messages` sequence is
    /// replaced wholesale, never merged.
    async fn upsert_chat(&self, chat: Chat) -> DbResult<()>;
    /// Fetch the full chat, messages decoded, or `DbError::NotFound`.
    async fn get_chat(&self, chat_id: Uuid) -> DbResult<Chat>;
    /// All `{id, name}` pairs. Order is whatever the store returns.
    async fn list_chats(&self) -> DbResult<Vec<ChatSummary>>;
}
