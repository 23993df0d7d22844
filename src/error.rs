use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;

/// Message shown to users for faults that are not theirs to fix
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Please enter a movie title.")]
    EmptyQuery,

    #[error("No movie found with title '{0}'.")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error is the user's to correct (resolver-level)
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::EmptyQuery | AppError::NotFound(_) | AppError::InvalidInput(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if !self.is_user_facing() {
            tracing::error!(error = %self, "Request failed");
        }

        let (status, message) = match &self {
            AppError::EmptyQuery | AppError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::InvariantViolation(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_FAILURE_MESSAGE.to_string(),
            ),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Response for a handler that panicked, shaped like any other internal fault
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// Failures while loading the catalog artifact at startup
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog has {catalog} rows but similarity matrix has {matrix}")]
    RowCountMismatch { catalog: usize, matrix: usize },

    #[error("Matrix row {row} is invalid: {reason}")]
    InvalidRow { row: usize, reason: String },
}

/// Failures of the external metadata lookup
///
/// None of these reach the user: callers substitute a placeholder poster.
#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Metadata API returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Metadata API rejected lookup: {0}")]
    Rejected(String),

    #[error("Malformed metadata response: {0}")]
    Malformed(String),
}
