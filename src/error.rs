use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Slot is no longer available")]
    SlotUnavailable,
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("{0}")]
    CancellationWindow(String),
    #[error("An open payment intent already exists for this reservation")]
    DuplicateIntent,
    #[error("Payment verification failed: {0}")]
    PaymentVerification(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// Recognizes the unique-violation codes raised by the active-slot index.
    /// 2067 = SQLite unique constraint, 23505 = Postgres unique violation.
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        if let sqlx::Error::Database(db_err) = err {
            let code = db_err.code().unwrap_or_default();
            code == "2067" || code == "23505"
        } else {
            false
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::SlotUnavailable => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidState(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::CancellationWindow(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::DuplicateIntent => (StatusCode::CONFLICT, self.to_string()),
            AppError::PaymentVerification(_) => (StatusCode::PAYMENT_REQUIRED, self.to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
