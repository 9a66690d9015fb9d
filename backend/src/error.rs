use crate::dbs::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Handler-level error mapped to a status code and an `{"error": msg}` body.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request field.
    Validation(String),
    /// Unknown chat id.
    NotFound(String),
    /// Completion provider failure (transport, non-2xx, malformed body).
    Upstream(String),
    /// Storage or file I/O failure.
    Internal(String),
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_not_found_maps_to_404() {
        let err: ApiError = DbError::NotFound("Chat x not found".into()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
