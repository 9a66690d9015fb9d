use crate::error::ApiError;
use axum::Json;
use axum::extract::Multipart;
use serde_json::{Value, json};
use std::path::Path;

const UPLOAD_DIR: &str = "uploads";
const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx"];

fn file_extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

fn is_allowed(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Strip any path components a client might smuggle into the filename.
fn sanitize_filename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Wrap file text in a fenced code block tagged with the file's extension,
/// shaped like a completion reply so the front end renders it the same way.
fn completion_envelope(filename: &str, content: &str) -> Value {
    let ext = file_extension(filename).unwrap_or_default();
    json!({
        "choices": [{
            "message": {
                "content": format!("```{ext}\n{content}\n```"),
                "role": "assistant"
            }
        }]
    })
}

pub async fn upload_file(mut multipart: Multipart) -> Result<Json<Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = sanitize_filename(field.file_name().unwrap_or_default());
        if filename.is_empty() {
            return Err(ApiError::Validation("Empty filename".into()));
        }
        if !is_allowed(&filename) {
            return Err(ApiError::Validation("Unsupported file type".into()));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        // The file lands in a scratch directory, is read back as UTF-8, and
        // the copy is removed. pdf/docx pass the extension check but are
        // decoded as text all the same, so binary content fails here rather
        // than uploading garbled.
        let filepath = Path::new(UPLOAD_DIR).join(&filename);
        tokio::fs::create_dir_all(UPLOAD_DIR)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        tokio::fs::write(&filepath, &bytes)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let content = tokio::fs::read_to_string(&filepath).await;
        let _ = tokio::fs::remove_file(&filepath).await;
        let content = content.map_err(|e| ApiError::Internal(e.to_string()))?;

        return Ok(Json(completion_envelope(&filename, &content)));
    }

    Err(ApiError::Validation("No file uploaded".into()))
}
