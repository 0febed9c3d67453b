use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;

use crate::utils::validation::ValidationError;

/// Failure kinds surfaced by the request/profile/document handlers. Every
/// variant is terminal for the triggering action; nothing here retries.
/// Authentication failures are raised earlier, by the bearer-token
/// middleware and the `AuthUser` extractor.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "validation failed on {}: {}", "_0.field", "_0.message")]
    Validation(ValidationError),

    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),

    #[display(fmt = "persistence failure")]
    Persistence,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(e) => HttpResponse::BadRequest().json(json!({
                "error": "validation",
                "field": e.field,
                "message": e.message,
            })),
            ApiError::NotFound(what) => HttpResponse::NotFound().json(json!({
                "error": format!("{what} not found")
            })),
            ApiError::Persistence => HttpResponse::InternalServerError().json(json!({
                "error": "Something went wrong, contact the system admin"
            })),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database operation failed");
        match e {
            sqlx::Error::RowNotFound => ApiError::NotFound("record"),
            _ => ApiError::Persistence,
        }
    }
}
