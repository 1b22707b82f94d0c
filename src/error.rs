//! Error types for Bibliotheca

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Outcome kinds surfaced to front ends, numbered from 1 in the JSON `code` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u32)]
pub enum ErrorCode {
    NoSuchData = 1,
    HasActiveLoans = 2,
    BadValue = 3,
    DbFailure = 4,
    NoConnection = 5,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// A business rule blocked the operation; nothing was changed.
    #[error("Refused: {0}")]
    Refused(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("No database connection: {0}")]
    NoConnection(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound(_) => ErrorCode::NoSuchData,
            AppError::Refused(_) => ErrorCode::HasActiveLoans,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::Database(_) | AppError::Migration(_) => ErrorCode::DbFailure,
            AppError::NoConnection(_) => ErrorCode::NoConnection,
        }
    }

    /// Text shown to the person at the console or web form.
    ///
    /// Storage failures are reduced to a generic sentence; the driver error
    /// has already been logged where it happened.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::Refused(msg) => msg.clone(),
            AppError::Validation(msg) => format!("Invalid input: {}", msg),
            AppError::Database(_) | AppError::Migration(_) => {
                "An error occurred: database operation failed".to_string()
            }
            AppError::NoConnection(_) => "An error occurred: no database connection".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        AppError::Validation(format!("missing required field(s): {}", fields.join(", ")))
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Refused(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NoConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let code = self.code();
        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message: self.user_message(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
