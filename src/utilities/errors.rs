use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Validation errors, {0}")]
    ValidatorValidationErrors(#[from] validator::ValidationErrors),
    #[error("Missing access token")]
    MissingAccessToken,
    #[error("{0}")]
    Unauthorized(String),
    #[error("jsonwebtoken error")]
    JsonWebTokenError(#[from] jsonwebtoken::errors::Error),
    #[error("{0} not set")]
    MissingEnvVar(&'static str),
    #[error("Database connection error")]
    DatabaseConnectionError,
    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("Serde json error")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("IO error, {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    /// Translates a unique-constraint violation (23505) into a Conflict,
    /// leaving every other database error untouched.
    pub fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                return AppError::Conflict(message.to_string());
            }
        }
        AppError::SqlxError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::NotFound(e) => (StatusCode::NOT_FOUND, e),
            Self::Forbidden(e) => (StatusCode::FORBIDDEN, e),
            Self::Conflict(e) => (StatusCode::CONFLICT, e),
            Self::ValidationError(e) => (StatusCode::UNPROCESSABLE_ENTITY, e),
            Self::ValidatorValidationErrors(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            Self::MissingAccessToken => (
                StatusCode::UNAUTHORIZED,
                "Missing access token".to_string(),
            ),
            Self::Unauthorized(e) => (StatusCode::UNAUTHORIZED, e),
            Self::JsonWebTokenError(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            Self::MissingEnvVar(name) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{name} not set"),
            ),
            Self::DatabaseConnectionError => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Database connection error".to_string(),
            ),
            Self::MigrateError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::SqlxError(e) => match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database unavailable".to_string(),
                ),
                other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
            },
            Self::SerdeJsonError(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            Self::IoError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(json!({"error": error_message}));

        (status, body).into_response()
    }
}
