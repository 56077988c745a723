//! # Services
//!
//! The consistency rule engines. Each service wraps a [`Database`] handle,
//! validates drafts, checks uniqueness and relational rules against the
//! store, then mutates it through the repositories.
//!
//! ```text
//! handler ──► CustomerService / AccountService ──► accounts-db repositories
//!                    │
//!                    └── ServiceError = CoreError (business) | DbError (storage)
//! ```
//!
//! [`Database`]: accounts_db::Database

pub mod account_service;
pub mod customer_service;

pub use account_service::AccountService;
pub use customer_service::CustomerService;

use accounts_core::{CoreError, ValidationError};
use accounts_db::DbError;
use thiserror::Error;

/// Failure raised by a service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A business rule rejected the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store failed; propagated unchanged.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
