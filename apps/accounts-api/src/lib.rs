//! # Accounts API
//!
//! REST server for customers and their bank accounts.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Accounts API                                    │
//! │                                                                         │
//! │  ┌────────────────────────┐        ┌──────────────────────────────────┐│
//! │  │  /api/customers        │        │  /api/accounts                   ││
//! │  │                        │        │                                  ││
//! │  │ • signup / edit        │        │ • open / edit / close            ││
//! │  │ • delete (cascades)    │        │ • current (Active) account       ││
//! │  │ • exact lookup         │        │ • by customer / branch / type /  ││
//! │  │ • substring search     │        │   status, all with owner names   ││
//! │  └───────────┬────────────┘        └────────────────┬─────────────────┘│
//! │              ▼                                      ▼                  │
//! │       CustomerService                        AccountService            │
//! │              └──────────────┬───────────────────────┘                  │
//! │                             ▼                                          │
//! │                   accounts-db (SQLite)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]; every key can be set through `ACCOUNTS_*`
//! environment variables.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};
pub use services::{AccountService, CustomerService, ServiceError};

use accounts_db::Database;
use handlers::{account, customer, health};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }

    pub fn customer_service(&self) -> CustomerService {
        CustomerService::new(self.db.clone())
    }

    pub fn account_service(&self) -> AccountService {
        AccountService::new(self.db.clone())
    }
}

/// Builds the HTTP router with every route and the request trace layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // Customers
        .route(
            "/api/customers",
            post(customer::create_customer).get(customer::list_customers),
        )
        .route("/api/customers/lookup", get(customer::lookup_customer))
        .route("/api/customers/email/{email}", get(customer::search_by_email))
        .route(
            "/api/customers/mobileNumber/{mobileNumber}",
            get(customer::search_by_mobile_number),
        )
        .route(
            "/api/customers/documentNumber/{documentNumber}",
            get(customer::search_by_document_number),
        )
        .route("/api/customers/name/{name}", get(customer::search_by_name))
        .route(
            "/api/customers/{customerId}",
            get(customer::get_customer)
                .put(customer::update_customer)
                .delete(customer::delete_customer),
        )
        // Accounts
        .route(
            "/api/accounts",
            post(account::create_account).get(account::current_account),
        )
        .route("/api/accounts/all", get(account::list_accounts))
        .route(
            "/api/accounts/customerId/{customerId}",
            get(account::list_by_customer),
        )
        .route(
            "/api/accounts/branchName/{branchName}",
            get(account::search_by_branch_name),
        )
        .route(
            "/api/accounts/accountType/{accountType}",
            get(account::search_by_account_type),
        )
        .route(
            "/api/accounts/accountStatus/{accountStatus}",
            get(account::search_by_account_status),
        )
        .route(
            "/api/accounts/{accountId}",
            put(account::update_account).delete(account::delete_account),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
