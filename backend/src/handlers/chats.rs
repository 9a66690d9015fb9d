use crate::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Chat, ChatSummary, CreateChatRequest, CreateChatResponse};
use uuid::Uuid;

pub async fn list_chats(State(state): State<AppState>) -> Result<Json<Vec<ChatSummary>>, ApiError> {
    let chats = state.db.list_chats().await.map_err(|e| {
        tracing::error!("Failed to list chats: {:?}", e);
        ApiError::from(e)
    })?;
    Ok(Json(chats))
}

pub async fn create_chat(
    State(state): State<AppState>,
    Json(payload): Json<CreateChatRequest>,
) -> Result<Json<CreateChatResponse>, ApiError> {
    let id = Uuid::new_v4();

    // Default name counts existing rows first. Two concurrent creates can
    // read the same count and pick the same suffix; that matches the wire
    // behavior this service is compatible with.
    let name = match payload.name {
        Some(name) => name,
        None => {
            let count = state.db.list_chats().await?.len();
            format!("Chat-{}", count + 1)
        }
    };

    let chat = Chat {
        id,
        name: name.clone(),
        messages: Vec::new(),
    };

    state.db.upsert_chat(chat).await.map_err(|e| {
        tracing::error!("Failed to create chat: {:?}", e);
        ApiError::from(e)
    })?;

    Ok(Json(CreateChatResponse { chat_id: id, name }))
}

pub async fn get_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Chat>, ApiError> {
    // Ids are opaque strings at the boundary; anything that is not one of
    // our generated ids is simply an unknown chat.
    let chat_id =
        Uuid::parse_str(&chat_id).map_err(|_| ApiError::NotFound("Chat not found".into()))?;
    let chat = state.db.get_chat(chat_id).await.map_err(|e| {
        if let crate::dbs::DbError::NotFound(_) = e {
            ApiError::NotFound("Chat not found".into())
        } else {
            tracing::error!("Failed to get chat: {:?}", e);
            ApiError::from(e)
        }
    })?;
    Ok(Json(chat))
}
