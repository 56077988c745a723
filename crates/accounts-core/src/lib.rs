//! # accounts-core: Pure Domain Layer for the Accounts Service
//!
//! This crate holds everything the accounts service knows about Customers and
//! Accounts that does not require talking to the database: row types, the
//! drafts callers submit, the views callers receive, draft validation, and the
//! domain error taxonomy.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Accounts Service Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 accounts-api (axum handlers)                    │   │
//! │  │   POST /api/customers ──► CustomerService ──► CustomerView      │   │
//! │  │   POST /api/accounts  ──► AccountService  ──► AccountView       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ accounts-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌─────────────┐              │   │
//! │  │   │   types   │  │ validation  │  │    error    │              │   │
//! │  │   │ Customer  │  │ draft rules │  │  NotFound   │              │   │
//! │  │   │ Account   │  │ lengths     │  │AlreadyExists│              │   │
//! │  │   │ Drafts    │  │ patterns    │  │ Validation  │              │   │
//! │  │   │ Views     │  │             │  │             │              │   │
//! │  │   └───────────┘  └─────────────┘  └─────────────┘              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 accounts-db (Database Layer)                    │   │
//! │  │          SQLite queries, migrations, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Rows, drafts and views for Customer and Account
//! - [`error`] - Domain error types
//! - [`validation`] - Draft validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use accounts_core::validation::validate_customer_draft;
//! use accounts_core::CustomerDraft;
//!
//! let draft = CustomerDraft {
//!     document_type: "CC".to_string(),
//!     document_number: "11122233".to_string(),
//!     name: "Cliente 1".to_string(),
//!     email: "cliente1@correo.com".to_string(),
//!     mobile_number: "1112223333".to_string(),
//! };
//!
//! assert!(validate_customer_draft(&draft).is_ok());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The literal status value that marks a customer's canonical account.
///
/// Matching is exact and case-sensitive: "active" or "ACTIVE" are just
/// other statuses.
pub const ACTIVE_STATUS: &str = "Active";

/// Smallest account number the generator can produce (10 digits).
pub const ACCOUNT_NUMBER_MIN: i64 = 1_000_000_000;

/// Width of the account number range: numbers are drawn uniformly from
/// `[ACCOUNT_NUMBER_MIN, ACCOUNT_NUMBER_MIN + ACCOUNT_NUMBER_SPAN)`.
pub const ACCOUNT_NUMBER_SPAN: i64 = 900_000_000;

/// Maximum length of a free-text search term.
pub const MAX_SEARCH_TERM_LEN: usize = 100;
