use crate::services::storage::StorageError;
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}: {source}")]
    Storage {
        message: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("{message}: {source}")]
    LocalIo {
        message: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Bad Request: {0}")]
    Validation(String),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl AppError {
    /// Adapter for `map_err` that tags a storage failure with the route's message.
    pub fn storage(message: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| AppError::Storage { message, source }
    }

    pub fn local_io(message: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| AppError::LocalIo { message, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            AppError::Storage { message, source } => {
                tracing::error!("{}: {}", message, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message.to_string(),
                    source.to_string(),
                )
            }
            AppError::LocalIo { message, source } => {
                tracing::error!("{}: {:?}", message, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message.to_string(),
                    source.to_string(),
                )
            }
            AppError::Validation(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, "Invalid request".to_string(), msg)
            }
            AppError::Multipart(e) => {
                tracing::warn!("Multipart error: {}", e);
                (e.status(), "Invalid upload".to_string(), e.body_text())
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error rendering page".to_string(),
                    e.to_string(),
                )
            }
        };

        let body = Json(json!({
            "message": message,
            "error": detail
        }));

        (status, body).into_response()
    }
}
