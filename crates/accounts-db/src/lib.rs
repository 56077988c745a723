//! # accounts-db: Database Layer for the Accounts Service
//!
//! This crate provides database access for the accounts service.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Accounts Data Flow                               │
//! │                                                                         │
//! │  CustomerService / AccountService (accounts-api)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   accounts-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (customer.rs)  │   │  (embedded)  │  │   │
//! │  │   │               │    │ (account.rs)   │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CustomerRepo   │   │ 001_initial_ │  │   │
//! │  │   │ Connection    │    │ AccountRepo    │   │   schema.sql │  │   │
//! │  │   │ Management    │    │                │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │              ./data/accounts.db (WAL mode)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Customer and account repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use accounts_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./data/accounts.db")).await?;
//!
//! let customer = db.customers().get_by_email("cliente1@correo.com").await?;
//! let active = db.accounts().find_active_by_customer(1).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::account::{generate_account_number, AccountRepository};
pub use repository::customer::CustomerRepository;
