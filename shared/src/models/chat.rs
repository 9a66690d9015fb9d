use super::message::ChatMessage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted conversation: id, display name, ordered transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub name: String,
    pub messages: Vec<ChatMessage>,
}

/// `{id, name}` projection used by the chat list endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateChatResponse {
    pub chat_id: Uuid,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CompletionRequest {
    /// Kept as a plain string: ids are opaque on the wire, and a malformed
    /// one must reach the handler (and 404 there) instead of being bounced
    /// by deserialization.
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}
