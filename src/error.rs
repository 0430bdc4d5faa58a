use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    BadRequest {
        message: String,
        details: Option<String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn item_not_found() -> Self {
        AppError::NotFound("Item not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::BadRequest { message, details } => match details {
                Some(details) => json!({ "error": message, "details": details }),
                None => json!({ "error": message }),
            },
            AppError::NotFound(msg) => json!({ "error": msg }),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                json!({ "error": "Database error", "details": e.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}
