use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// `Generation` is special: inside the pipeline it is routed to the fallback
/// script path and never reaches the caller. It only surfaces as a response
/// if something bypasses that safety net.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Empty document: {0}")]
    EmptyDocument(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid template type: {0}")]
    InvalidTemplate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::UnsupportedFormat(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNSUPPORTED_FORMAT",
                msg.clone(),
            ),
            AppError::EmptyDocument(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_DOCUMENT",
                msg.clone(),
            ),
            AppError::Parse(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "PARSE_ERROR", msg.clone()),
            AppError::InvalidTemplate(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_TEMPLATE", msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    "The script generation backend is unavailable".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        let resp = AppError::InvalidTemplate("nope".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::Parse("name not found".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = AppError::UnsupportedFormat("not a docx".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_generation_error_maps_to_bad_gateway() {
        let resp = AppError::Generation("backend down".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_error_messages_are_human_readable() {
        let err = AppError::Parse("name not found".to_string());
        assert_eq!(err.to_string(), "Parse error: name not found");
    }
}
