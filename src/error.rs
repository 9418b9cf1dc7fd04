use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

use crate::validation::ValidationReport;

/// Failure of a service or repository call, rendered as an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {}", .0.summary())]
    Validation(ValidationReport),
    #[error("{0}")]
    NotFound(String),
    #[error("not authorized")]
    Unauthorized,
    #[error("not authorized")]
    Forbidden,
    #[error("invalid or missing CSRF token")]
    CsrfMismatch,
    #[error("{0}")]
    Conflict(String),
    #[error("too many failed login attempts, try again later")]
    TooManyAttempts,
    #[error("{0}")]
    BadRequest(String),
    #[error("database error")]
    Database(#[source] sqlx::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }
}

/// Constraint violations are caller mistakes, anything else is a 500.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::Conflict("record already exists".to_string());
            }
            if db_err.is_foreign_key_violation() {
                return AppError::Conflict("record is still referenced".to_string());
            }
            if db_err.is_check_violation() {
                return AppError::BadRequest("value out of range".to_string());
            }
        }
        AppError::Database(e)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("password hashing failed: {}", e))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        AppError::Internal(format!("token encoding failed: {}", e))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::CsrfMismatch => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(report) => HttpResponse::build(self.status_code()).json(json!({
                "success": false,
                "message": report.summary(),
                "errors": report.error_messages(),
                "warnings": report.warning_messages(),
                "issues": {
                    "errors": report.errors,
                    "warnings": report.warnings,
                }
            })),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                HttpResponse::InternalServerError().json(json!({
                    "success": false,
                    "message": "Database error"
                }))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "success": false,
                    "message": "Internal server error"
                }))
            }
            other => HttpResponse::build(other.status_code()).json(json!({
                "success": false,
                "message": other.to_string()
            })),
        }
    }
}
