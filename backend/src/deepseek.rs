use crate::AppState;
use crate::dbs::DbError;
use crate::error::ApiError;
use axum::{Json, extract::State};
use serde_json::{Value, json};
use shared::models::{Chat, ChatMessage, CompletionRequest};

pub const DEFAULT_API_BASE: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
const VALID_MODELS: &[&str] = &["deepseek-chat", "deepseek-reasoner"];

/// Thin HTTP client for the DeepSeek chat-completions endpoint.
///
/// Works on raw `serde_json::Value` rather than typed response structs:
/// the relay contract hands the provider body back to the caller verbatim,
/// including fields we never look at (usage, reasoning_content, ...).
#[derive(Clone)]
pub struct DeepseekClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl DeepseekClient {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into(),
        }
    }

    /// Reads `DEEPSEEK_API_KEY` (the provider credential) and the optional
    /// `DEEPSEEK_API_BASE` override.
    pub fn from_env() -> Self {
        let api_key = std::env::var("DEEPSEEK_API_KEY").unwrap_or_default();
        let api_base =
            std::env::var("DEEPSEEK_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(api_key, api_base)
    }

    /// One synchronous completion round trip. No retries, no streaming; the
    /// transport's default timeout is the only timeout.
    pub async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Value, ApiError> {
        let payload = json!({
            "model": model,
            "messages": messages,
            "temperature": 0.0,
        });
        tracing::debug!(%model, count = messages.len(), "sending completion payload");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("API Error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!("API Error: HTTP {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Upstream(format!("API Error: invalid response body: {e}")))
    }
}

/// Unknown models silently fall back to the default. Compatibility quirk:
/// the caller is not told their model was replaced.
fn resolve_model(requested: Option<&str>) -> &str {
    match requested {
        Some(model) if VALID_MODELS.contains(&model) => model,
        _ => DEFAULT_MODEL,
    }
}

/// `POST /api/chat`: merge stored history with the request's messages, call
/// the provider once, persist history ++ new ++ reply, and return the
/// provider's body untouched. Nothing is persisted on any failure.
pub async fn relay_completion(
    State(state): State<AppState>,
    Json(payload): Json<CompletionRequest>,
) -> Result<Json<Value>, ApiError> {
    let model = resolve_model(payload.model.as_deref());

    // An absent or empty id is a missing field; a present-but-unknown string
    // (malformed ids included) is a lookup miss.
    let chat_id = match payload.chat_id.as_deref() {
        None | Some("") => return Err(ApiError::Validation("Missing chat ID".into())),
        Some(id) => {
            uuid::Uuid::parse_str(id).map_err(|_| ApiError::NotFound("Chat not found".into()))?
        }
    };

    let chat = state.db.get_chat(chat_id).await.map_err(|e| {
        if let DbError::NotFound(_) = e {
            ApiError::NotFound("Chat not found".into())
        } else {
            tracing::error!("Failed to load chat for relay: {:?}", e);
            ApiError::from(e)
        }
    })?;

    let mut all_messages = chat.messages;
    all_messages.extend(payload.messages);

    let response = state.deepseek.complete(model, &all_messages).await?;

    let reply: ChatMessage = response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .cloned()
        .and_then(|m| serde_json::from_value(m).ok())
        .ok_or_else(|| {
            ApiError::Upstream("API Error: response carried no assistant message".into())
        })?;

    all_messages.push(reply);
    state
        .db
        .upsert_chat(Chat {
            id: chat_id,
            name: chat.name,
            messages: all_messages,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to persist relayed transcript: {:?}", e);
            ApiError::from(e)
        })?;

    Ok(Json(response))
}
