use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Secret retrieval failed: {0}")]
    Secret(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");

        let message = match self {
            AppError::Database(_) => "Database error",
            AppError::Secret(_) | AppError::Config(_) | AppError::Io(_) => "Internal error",
        };

        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
