//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Accounts API                       │
//! │                                                                         │
//! │  Handler -> Result<T, ApiError>                                         │
//! │       │                                                                 │
//! │       ├── JSON body / path rejected ──────► 400 VALIDATION_ERROR        │
//! │       ├── ValidationError ────────────────► 400 VALIDATION_ERROR        │
//! │       ├── CoreError::NotFound ────────────► 404 NOT_FOUND               │
//! │       ├── CoreError::AlreadyExists ───────► 409 ALREADY_EXISTS          │
//! │       └── DbError (logged, message hidden) ► 500 DATABASE_ERROR         │
//! │                                                                         │
//! │  Body: { "code": "NOT_FOUND", "message": "Customer not found ..." }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::ServiceError;
use accounts_core::{CoreError, ValidationError};
use accounts_db::DbError;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "ALREADY_EXISTS",
///   "message": "Customer already registered with given email cliente1@correo.com"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Uniqueness or ownership rule violated (409)
    AlreadyExists,

    /// Input validation failed (400)
    ValidationError,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::AlreadyExists => StatusCode::CONFLICT,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts database errors to API errors.
///
/// Storage details go to the log, not to the client.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let message = match &err {
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => "Database unavailable",
            DbError::TransactionFailed(_) => "Database transaction failed",
            _ => "Database operation failed",
        };
        tracing::error!(error = %err, "Database error");
        ApiError::new(ErrorCode::DatabaseError, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::AlreadyExists { message, .. } => {
                ApiError::new(ErrorCode::AlreadyExists, message)
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(e) => e.into(),
            ServiceError::Db(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err = ApiError::from(CoreError::not_found("Customer", "customerId", 7));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(
            err.message,
            "Customer not found with the given input data customerId : '7'"
        );

        let err = ApiError::from(CoreError::already_exists("Account", "taken"));
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(err.message, "taken");
        assert_eq!(err.code.status(), StatusCode::CONFLICT);

        let err = ApiError::from(CoreError::Validation(ValidationError::Required {
            field: "name".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err = ApiError::from(DbError::QueryFailed("no such table: customers".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("customers"));
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_value(ApiError::new(ErrorCode::AlreadyExists, "dup")).unwrap();
        assert_eq!(json["code"], "ALREADY_EXISTS");
        assert_eq!(json["message"], "dup");
    }
}
