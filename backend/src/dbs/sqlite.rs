use crate::dbs::{Database, DbError, DbResult};
use async_trait::async_trait;
use shared::models::{Chat, ChatMessage, ChatSummary};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: Pool<Sqlite>,
}

impl SqliteDatabase {
    /// Open (creating if missing) the database at `url` and ensure the
    /// schema exists.
    pub async fn connect(url: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(DbError::Sqlx)?
            .create_if_missing(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    async fn init(&self) -> DbResult<()> {
        // Transcripts live in a single serialized text column; there is no
        // per-message table.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chats (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                messages TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn upsert_chat(&self, chat: Chat) -> DbResult<()> {
        let messages_json = serde_json::to_string(&chat.messages)?;
        sqlx::query("INSERT OR REPLACE INTO chats (id, name, messages) VALUES ($1, $2, $3)")
            .bind(chat.id.to_string())
            .bind(chat.name)
            .bind(messages_json)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_chat(&self, chat_id: Uuid) -> DbResult<Chat> {
        let row = sqlx::query("SELECT id, name, messages FROM chats WHERE id = $1")
            .bind(chat_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let messages_json: String = row.get("messages");
                let messages: Vec<ChatMessage> = serde_json::from_str(&messages_json)?;
                Ok(Chat {
                    id: chat_id,
                    name: row.get("name"),
                    messages,
                })
            }
            None => Err(DbError::NotFound(format!("Chat {} not found", chat_id))),
        }
    }

    async fn list_chats(&self) -> DbResult<Vec<ChatSummary>> {
        let rows = sqlx::query("SELECT id, name FROM chats")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let id_text: String = row.get("id");
                let id = Uuid::parse_str(&id_text)
                    .map_err(|e| DbError::Internal(format!("corrupt chat id {id_text}: {e}")))?;
                Ok(ChatSummary {
                    id,
                    name: row.get("name"),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ROLE_ASSISTANT, ROLE_USER};

    async fn temp_db() -> (tempfile::TempDir, SqliteDatabase) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/chats.db", dir.path().display());
        let db = SqliteDatabase::connect(&url).await.unwrap();
        (dir, db)
    }

    fn chat_with(messages: Vec<ChatMessage>) -> Chat {
        Chat {
            id: Uuid::new_v4(),
            name: "Chat-1".into(),
            messages,
        }
    }

    #[tokio::test]
    async fn get_unknown_chat_is_not_found() {
        let (_dir, db) = temp_db().await;
        let result = db.get_chat(Uuid::new_v4()).await;
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[tokio::test]
    async fn upsert_then_get_preserves_message_order() {
        let (_dir, db) = temp_db().await;
        let chat = chat_with(vec![
            ChatMessage::new(ROLE_USER, "first"),
            ChatMessage::new(ROLE_ASSISTANT, "second"),
            ChatMessage::new(ROLE_USER, "third"),
        ]);
        db.upsert_chat(chat.clone()).await.unwrap();

        let loaded = db.get_chat(chat.id).await.unwrap();
        assert_eq!(loaded, chat);
    }

    #[tokio::test]
    async fn upsert_replaces_the_whole_transcript() {
        let (_dir, db) = temp_db().await;
        let mut chat = chat_with(vec![ChatMessage::new(ROLE_USER, "old")]);
        db.upsert_chat(chat.clone()).await.unwrap();

        chat.messages = vec![ChatMessage::new(ROLE_USER, "new")];
        db.upsert_chat(chat.clone()).await.unwrap();

        let loaded = db.get_chat(chat.id).await.unwrap();
        assert_eq!(loaded.messages, chat.messages);
    }

    #[tokio::test]
    async fn list_chats_returns_every_row() {
        let (_dir, db) = temp_db().await;
        let a = chat_with(Vec::new());
        let b = chat_with(Vec::new());
        db.upsert_chat(a.clone()).await.unwrap();
        db.upsert_chat(b.clone()).await.unwrap();

        let mut ids: Vec<Uuid> = db.list_chats().await.unwrap().iter().map(|c| c.id).collect();
        ids.sort();
        let mut expected = vec![a.id, b.id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn corrupt_stored_id_is_an_internal_error() {
        let (_dir, db) = temp_db().await;
        sqlx::query("INSERT INTO chats (id, name, messages) VALUES ('garbage', 'Chat-1', '[]')")
            .execute(&db.pool)
            .await
            .unwrap();

        let result = db.list_chats().await;
        assert!(matches!(result, Err(DbError::Internal(_))));
    }

    #[tokio::test]
    async fn empty_transcript_round_trips() {
        let (_dir, db) = temp_db().await;
        let chat = chat_with(Vec::new());
        db.upsert_chat(chat.clone()).await.unwrap();
        assert!(db.get_chat(chat.id).await.unwrap().messages.is_empty());
    }
}
