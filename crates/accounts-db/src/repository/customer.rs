//! # Customer Repository
//!
//! Database operations for customers.
//!
//! Exact finders (`get_by_*`) return `Option`; substring finders
//! (`search_by_*`) return a possibly empty `Vec`. Deciding whether an empty
//! result is an error is left to the services.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::account::AccountRepository;
use crate::repository::{contains_pattern, fold};
use accounts_core::{Customer, CustomerDraft};

/// Repository for customer database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CustomerRepository::new(pool);
///
/// let customer = repo.get_by_email("cliente1@correo.com").await?;
/// let perezes = repo.search_by_name("perez").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by its ID.
    pub async fn get_by_id(&self, customer_id: i64) -> DbResult<Option<Customer>> {
        let customer =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE customer_id = ?1")
                .bind(customer_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(customer)
    }

    /// Gets a customer by exact email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        self.get_by_column("email", email).await
    }

    /// Gets a customer by exact mobile number.
    pub async fn get_by_mobile_number(&self, mobile_number: &str) -> DbResult<Option<Customer>> {
        self.get_by_column("mobile_number", mobile_number).await
    }

    /// Gets a customer by exact document number.
    pub async fn get_by_document_number(
        &self,
        document_number: &str,
    ) -> DbResult<Option<Customer>> {
        self.get_by_column("document_number", document_number).await
    }

    /// Exact lookup on one of the unique columns.
    async fn get_by_column(&self, column: &'static str, value: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT * FROM customers WHERE {column} = ?1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(value.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Case-insensitive substring search on `email`.
    pub async fn search_by_email(&self, term: &str) -> DbResult<Vec<Customer>> {
        self.search_column("email", term).await
    }

    /// Case-insensitive substring search on `mobile_number`.
    pub async fn search_by_mobile_number(&self, term: &str) -> DbResult<Vec<Customer>> {
        self.search_column("mobile_number", term).await
    }

    /// Case-insensitive substring search on `document_number`.
    pub async fn search_by_document_number(&self, term: &str) -> DbResult<Vec<Customer>> {
        self.search_column("document_number", term).await
    }

    /// Case-insensitive substring search on `name`.
    pub async fn search_by_name(&self, term: &str) -> DbResult<Vec<Customer>> {
        self.search_column("name", term).await
    }

    /// Matches the lowercased term against the column's `_folded` twin.
    async fn search_column(&self, column: &'static str, term: &str) -> DbResult<Vec<Customer>> {
        debug!(column, term = %term, "Searching customers");

        let sql = format!(
            r"SELECT * FROM customers WHERE {column}_folded LIKE ?1 ESCAPE '\' ORDER BY customer_id"
        );

        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(contains_pattern(&fold(term)))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = customers.len(), "Search returned customers");
        Ok(customers)
    }

    /// Lists every customer, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Customer>> {
        let customers =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY customer_id")
                .fetch_all(&self.pool)
                .await?;

        Ok(customers)
    }

    /// Inserts a new customer.
    ///
    /// Text fields are stored trimmed.
    ///
    /// ## Returns
    /// * `Ok(Customer)` - Inserted row with its new identity
    /// * `Err(DbError::UniqueViolation)` - Email, mobile or document taken
    pub async fn insert(&self, draft: &CustomerDraft) -> DbResult<Customer> {
        debug!(email = %draft.email, "Inserting customer");

        let now = Utc::now();
        let mut customer = Customer {
            customer_id: 0,
            document_type: draft.document_type.trim().to_string(),
            document_number: draft.document_number.trim().to_string(),
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            mobile_number: draft.mobile_number.trim().to_string(),
            created_at: now,
            updated_at: now,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO customers (
                document_type, document_number, name, email, mobile_number,
                document_number_folded, name_folded, email_folded, mobile_number_folded,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
        )
        .bind(&customer.document_type)
        .bind(&customer.document_number)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.mobile_number)
        .bind(fold(&customer.document_number))
        .bind(fold(&customer.name))
        .bind(fold(&customer.email))
        .bind(fold(&customer.mobile_number))
        .bind(now)
        .execute(&self.pool)
        .await?;

        customer.customer_id = result.last_insert_rowid();
        Ok(customer)
    }

    /// Overwrites the profile fields of a customer.
    ///
    /// Identity, `created_at` and accounts are untouched.
    ///
    /// ## Returns
    /// * `Ok(true)` - Row updated
    /// * `Ok(false)` - No row with that ID
    /// * `Err(DbError::UniqueViolation)` - Another customer holds a unique value
    pub async fn update(&self, customer_id: i64, draft: &CustomerDraft) -> DbResult<bool> {
        debug!(customer_id, "Updating customer");

        let result = sqlx::query(
            r#"
            UPDATE customers SET
                document_type = ?2,
                document_number = ?3,
                name = ?4,
                email = ?5,
                mobile_number = ?6,
                document_number_folded = ?7,
                name_folded = ?8,
                email_folded = ?9,
                mobile_number_folded = ?10,
                updated_at = ?11
            WHERE customer_id = ?1
            "#,
        )
        .bind(customer_id)
        .bind(draft.document_type.trim())
        .bind(draft.document_number.trim())
        .bind(draft.name.trim())
        .bind(draft.email.trim())
        .bind(draft.mobile_number.trim())
        .bind(fold(&draft.document_number))
        .bind(fold(&draft.name))
        .bind(fold(&draft.email))
        .bind(fold(&draft.mobile_number))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a customer and every account it owns, atomically.
    ///
    /// Accounts go first so the foreign key never dangles.
    ///
    /// ## Returns
    /// * `Ok(true)` - Customer removed (with its accounts)
    /// * `Ok(false)` - No customer with that ID; nothing changed
    pub async fn delete_with_accounts(&self, customer_id: i64) -> DbResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let accounts = AccountRepository::delete_by_customer_id(&mut *tx, customer_id).await?;

        let result = sqlx::query("DELETE FROM customers WHERE customer_id = ?1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the account deletes
            return Ok(false);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(customer_id, accounts, "Customer deleted with its accounts");
        Ok(true)
    }

    /// Counts all customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
