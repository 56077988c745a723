//! # Error Types
//!
//! Domain-specific error types for accounts-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  accounts-core errors (this file)                                      │
//! │  ├── CoreError        - NotFound / AlreadyExists / Validation          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  accounts-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  accounts-api errors                                                   │
//! │  ├── ServiceError     - CoreError or DbError, as raised by services    │
//! │  └── ApiError         - What HTTP clients see (JSON + status code)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError → Client  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule failures raised by the consistency rules.
///
/// Neither kind is retried: both are terminal for the current request and
/// reach the caller as a client-visible failure.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced entity does not exist.
    ///
    /// ## When This Occurs
    /// - Lookup by id / email / mobile number finds no row
    /// - Creating an account for an unknown customer
    /// - Listing accounts by a filter that matches nothing
    #[error("{entity} not found with the given input data {field} : '{value}'")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// A uniqueness or relational invariant would be violated.
    ///
    /// ## When This Occurs
    /// - Email, mobile number or document number already taken
    /// - Customer already owns an Active account
    /// - Account update tries to move the account to another customer
    #[error("{message}")]
    AlreadyExists { entity: String, message: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for `entity` looked up by `field = value`.
    pub fn not_found(
        entity: impl Into<String>,
        field: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Creates an AlreadyExists error.
    pub fn already_exists(entity: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::AlreadyExists {
            entity: entity.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a draft doesn't meet the field rules.
/// Checked before any consistency rule touches the store.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email, non-numeric mobile number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = CoreError::not_found("Customer", "customerId", 42);
        assert_eq!(
            err.to_string(),
            "Customer not found with the given input data customerId : '42'"
        );
    }

    #[test]
    fn test_already_exists_message_is_verbatim() {
        let err = CoreError::already_exists(
            "Customer",
            "Customer already registered with given email a@b.co",
        );
        assert_eq!(
            err.to_string(),
            "Customer already registered with given email a@b.co"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::TooShort {
            field: "name".to_string(),
            min: 5,
        };
        assert_eq!(err.to_string(), "name must be at least 5 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "branchName".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
