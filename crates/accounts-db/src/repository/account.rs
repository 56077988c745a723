//! # Account Repository
//!
//! Database operations for accounts.
//!
//! ## Key Operations
//! - Point lookups and per-customer listings
//! - Case-insensitive substring search on branch, type and status
//! - Guarded insert that keeps at most one Active account per customer
//!
//! ## The Active Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  insert_if_no_active (one statement)                    │
//! │                                                                         │
//! │  INSERT INTO accounts (...)                                            │
//! │  SELECT ?1, ?2, ... 'Active'                                           │
//! │  WHERE NOT EXISTS (Active account for customer ?1)                     │
//! │       │                                                                 │
//! │       ├── 1 row  ──► Some(Account)                                     │
//! │       └── 0 rows ──► None  (customer already has an Active account)    │
//! │                                                                         │
//! │  SQLite runs one writer at a time, so two racing opens for the same    │
//! │  customer cannot both see "no Active account".                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use rand::Rng;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::{contains_pattern, fold};
use accounts_core::{
    Account, AccountCreateDraft, AccountUpdateDraft, ACCOUNT_NUMBER_MIN, ACCOUNT_NUMBER_SPAN,
    ACTIVE_STATUS,
};

/// An account joined with its owner's name; the owner may be gone.
#[derive(Debug, sqlx::FromRow)]
struct AccountWithOwner {
    #[sqlx(flatten)]
    account: Account,
    owner_name: Option<String>,
}

/// Repository for account database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = AccountRepository::new(pool);
///
/// let active = repo.find_active_by_customer(1).await?;
/// let at_niza = repo.search_by_branch_name("niza").await?;
/// ```
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Gets an account by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - Account not found
    pub async fn get_by_id(&self, account_id: i64) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE account_id = ?1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Gets the customer's Active account, if any.
    ///
    /// Status comparison is exact (`"Active"`, not `"active"`).
    pub async fn find_active_by_customer(&self, customer_id: i64) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT * FROM accounts
            WHERE customer_id = ?1 AND account_status = ?2
            ORDER BY account_id
            LIMIT 1
            "#,
        )
        .bind(customer_id)
        .bind(ACTIVE_STATUS)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Lists every account owned by a customer, regardless of status.
    pub async fn list_by_customer(&self, customer_id: i64) -> DbResult<Vec<Account>> {
        debug!(customer_id, "Listing accounts by customer");

        let accounts = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE customer_id = ?1 ORDER BY account_id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    /// Case-insensitive substring search on `branch_name`.
    pub async fn search_by_branch_name(&self, term: &str) -> DbResult<Vec<Account>> {
        self.search_column("branch_name", term).await
    }

    /// Case-insensitive substring search on `account_type`.
    pub async fn search_by_account_type(&self, term: &str) -> DbResult<Vec<Account>> {
        self.search_column("account_type", term).await
    }

    /// Case-insensitive substring search on `account_status`.
    pub async fn search_by_account_status(&self, term: &str) -> DbResult<Vec<Account>> {
        self.search_column("account_status", term).await
    }

    /// Shared body of the `search_by_*` finders.
    ///
    /// `column` is always one of the literals above, never caller input.
    /// The lowercased term is matched against the column's `_folded` twin.
    async fn search_column(&self, column: &'static str, term: &str) -> DbResult<Vec<Account>> {
        debug!(column, term = %term, "Searching accounts");

        let sql = format!(
            r"SELECT * FROM accounts WHERE {column}_folded LIKE ?1 ESCAPE '\' ORDER BY account_id"
        );

        let accounts = sqlx::query_as::<_, Account>(&sql)
            .bind(contains_pattern(&fold(term)))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = accounts.len(), "Search returned accounts");
        Ok(accounts)
    }

    /// Lists every account with its owner's name.
    ///
    /// Accounts whose owner no longer resolves are kept with `None`.
    pub async fn list_all_with_owner_names(&self) -> DbResult<Vec<(Account, Option<String>)>> {
        let rows = sqlx::query_as::<_, AccountWithOwner>(
            r#"
            SELECT a.*, c.name AS owner_name
            FROM accounts a
            LEFT JOIN customers c ON c.customer_id = a.customer_id
            ORDER BY a.account_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.account, row.owner_name))
            .collect())
    }

    /// Opens an Active account unless the customer already has one.
    ///
    /// ## Arguments
    /// * `draft` - Owner, type and branch
    /// * `account_number` - Pre-generated number (see [`generate_account_number`])
    ///
    /// ## Returns
    /// * `Ok(Some(Account))` - Inserted
    /// * `Ok(None)` - Customer already owns an Active account
    /// * `Err(DbError::UniqueViolation)` - `accounts.account_number` collided
    /// * `Err(DbError::ForeignKeyViolation)` - Customer does not exist
    pub async fn insert_if_no_active(
        &self,
        draft: &AccountCreateDraft,
        account_number: i64,
    ) -> DbResult<Option<Account>> {
        debug!(
            customer_id = draft.customer_id,
            account_number, "Inserting account"
        );

        let now = Utc::now();
        let account_type = draft.account_type.trim();
        let branch_name = draft.branch_name.trim();

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (
                customer_id, account_number, account_type, branch_name,
                account_status, account_type_folded, branch_name_folded,
                account_status_folded, created_at, updated_at
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9
            WHERE NOT EXISTS (
                SELECT 1 FROM accounts WHERE customer_id = ?1 AND account_status = ?5
            )
            "#,
        )
        .bind(draft.customer_id)
        .bind(account_number)
        .bind(account_type)
        .bind(branch_name)
        .bind(ACTIVE_STATUS)
        .bind(fold(account_type))
        .bind(fold(branch_name))
        .bind(fold(ACTIVE_STATUS))
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(Account {
            account_id: result.last_insert_rowid(),
            customer_id: draft.customer_id,
            account_number,
            account_type: account_type.to_string(),
            branch_name: branch_name.to_string(),
            account_status: ACTIVE_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        }))
    }

    /// Overwrites type, branch and status of an account.
    ///
    /// Owner and number are never touched.
    ///
    /// ## Returns
    /// * `Ok(true)` - Row updated
    /// * `Ok(false)` - No row with that ID (deleted meanwhile)
    pub async fn update(&self, account_id: i64, draft: &AccountUpdateDraft) -> DbResult<bool> {
        debug!(account_id, "Updating account");

        let result = sqlx::query(
            r#"
            UPDATE accounts SET
                account_type = ?2,
                branch_name = ?3,
                account_status = ?4,
                account_type_folded = ?5,
                branch_name_folded = ?6,
                account_status_folded = ?7,
                updated_at = ?8
            WHERE account_id = ?1
            "#,
        )
        .bind(account_id)
        .bind(draft.account_type.trim())
        .bind(draft.branch_name.trim())
        .bind(draft.account_status.trim())
        .bind(fold(&draft.account_type))
        .bind(fold(&draft.branch_name))
        .bind(fold(&draft.account_status))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes one account.
    ///
    /// Returns `false` when no row had that ID.
    pub async fn delete(&self, account_id: i64) -> DbResult<bool> {
        debug!(account_id, "Deleting account");

        let result = sqlx::query("DELETE FROM accounts WHERE account_id = ?1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every account of a customer on the given executor.
    ///
    /// Takes an executor rather than `&self` so it can run inside the
    /// customer-deletion transaction.
    ///
    /// ## Returns
    /// Number of accounts removed.
    pub async fn delete_by_customer_id<'e, E>(executor: E, customer_id: i64) -> DbResult<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM accounts WHERE customer_id = ?1")
            .bind(customer_id)
            .execute(executor)
            .await?;

        debug!(customer_id, deleted = result.rows_affected(), "Deleted customer accounts");
        Ok(result.rows_affected())
    }

    /// Counts all accounts (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Draws a random 10-digit account number.
///
/// Uniform over `[1_000_000_000, 1_900_000_000)`. Uniqueness is left to the
/// `accounts.account_number` constraint; callers retry on collision.
pub fn generate_account_number() -> i64 {
    ACCOUNT_NUMBER_MIN + rand::rng().random_range(0..ACCOUNT_NUMBER_SPAN)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};
    use accounts_core::CustomerDraft;

    async fn db_with_customer() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db
            .customers()
            .insert(&CustomerDraft {
                document_type: "CC".to_string(),
                document_number: "11122233".to_string(),
                name: "Cliente 1".to_string(),
                email: "cliente1@correo.com".to_string(),
                mobile_number: "1112223333".to_string(),
            })
            .await
            .unwrap();
        (db, customer.customer_id)
    }

    fn create_draft(customer_id: i64, branch: &str) -> AccountCreateDraft {
        AccountCreateDraft {
            customer_id,
            account_type: "Savings".to_string(),
            branch_name: branch.to_string(),
        }
    }

    #[test]
    fn test_generate_account_number_has_ten_digits() {
        for _ in 0..1000 {
            let n = generate_account_number();
            assert!((1_000_000_000..1_900_000_000).contains(&n));
            assert_eq!(n.to_string().len(), 10);
        }
    }

    #[tokio::test]
    async fn test_insert_if_no_active_guards_second_active() {
        let (db, customer_id) = db_with_customer().await;
        let repo = db.accounts();

        let first = repo
            .insert_if_no_active(&create_draft(customer_id, "Bulevar Niza"), 1_000_000_001)
            .await
            .unwrap()
            .expect("first account is inserted");
        assert!(first.is_active());
        assert_eq!(first.account_id, 1);

        let second = repo
            .insert_if_no_active(&create_draft(customer_id, "Centro Mayor"), 1_000_000_002)
            .await
            .unwrap();
        assert!(second.is_none());

        let fetched = repo.find_active_by_customer(customer_id).await.unwrap().unwrap();
        assert_eq!(fetched.account_number, 1_000_000_001);
    }

    #[tokio::test]
    async fn test_insert_for_unknown_customer_violates_foreign_key() {
        let (db, _) = db_with_customer().await;

        let err = db
            .accounts()
            .insert_if_no_active(&create_draft(99, "Bulevar Niza"), 1_000_000_001)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_account_number_is_unique_violation() {
        let (db, customer_id) = db_with_customer().await;
        let repo = db.accounts();

        let first = repo
            .insert_if_no_active(&create_draft(customer_id, "Bulevar Niza"), 1_000_000_001)
            .await
            .unwrap()
            .unwrap();

        // Free the Active slot so only the number can collide
        let deactivate = AccountUpdateDraft {
            customer_id,
            account_type: "Savings".to_string(),
            branch_name: "Bulevar Niza".to_string(),
            account_status: "Inactive".to_string(),
        };
        assert!(repo.update(first.account_id, &deactivate).await.unwrap());

        let err = repo
            .insert_if_no_active(&create_draft(customer_id, "Centro Mayor"), 1_000_000_001)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation_on("accounts.account_number"));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let (db, customer_id) = db_with_customer().await;
        let repo = db.accounts();

        repo.insert_if_no_active(&create_draft(customer_id, "Bulevar Niza"), 1_000_000_001)
            .await
            .unwrap();

        assert_eq!(repo.search_by_branch_name("niza").await.unwrap().len(), 1);
        assert_eq!(repo.search_by_branch_name("NIZA").await.unwrap().len(), 1);
        assert_eq!(repo.search_by_account_type("sav").await.unwrap().len(), 1);
        assert_eq!(repo.search_by_account_status("act").await.unwrap().len(), 1);
        assert!(repo.search_by_branch_name("Centro").await.unwrap().is_empty());

        // Wildcards in the term are literal
        assert!(repo.search_by_branch_name("%").await.unwrap().is_empty());
        assert!(repo.search_by_branch_name("_").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_folds_accented_case() {
        let (db, customer_id) = db_with_customer().await;
        let repo = db.accounts();

        let account = repo
            .insert_if_no_active(&create_draft(customer_id, "BOGOTÁ ÚNICO"), 1_000_000_001)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(repo.search_by_branch_name("bogotá").await.unwrap().len(), 1);
        assert_eq!(repo.search_by_branch_name("Único").await.unwrap().len(), 1);

        let edit = AccountUpdateDraft {
            customer_id,
            account_type: "AHORROS ÉLITE".to_string(),
            branch_name: "BOGOTÁ ÚNICO".to_string(),
            account_status: "SUSPENDIDA".to_string(),
        };
        assert!(repo.update(account.account_id, &edit).await.unwrap());
        assert_eq!(repo.search_by_account_type("élite").await.unwrap().len(), 1);
        assert_eq!(repo.search_by_account_status("suspendida").await.unwrap().len(), 1);
        assert!(repo.search_by_account_status("active").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_report_missing_rows() {
        let (db, customer_id) = db_with_customer().await;
        let repo = db.accounts();

        let draft = AccountUpdateDraft {
            customer_id,
            account_type: "Checking".to_string(),
            branch_name: "Centro Mayor".to_string(),
            account_status: "Inactive".to_string(),
        };
        assert!(!repo.update(42, &draft).await.unwrap());
        assert!(!repo.delete(42).await.unwrap());

        let account = repo
            .insert_if_no_active(&create_draft(customer_id, "Bulevar Niza"), 1_000_000_001)
            .await
            .unwrap()
            .unwrap();

        assert!(repo.update(account.account_id, &draft).await.unwrap());
        let updated = repo.get_by_id(account.account_id).await.unwrap().unwrap();
        assert_eq!(updated.account_type, "Checking");
        assert_eq!(updated.account_status, "Inactive");
        assert_eq!(updated.account_number, 1_000_000_001);
        assert!(repo.find_active_by_customer(customer_id).await.unwrap().is_none());

        assert!(repo.delete(account.account_id).await.unwrap());
        assert!(repo.get_by_id(account.account_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_with_owner_names() {
        let (db, customer_id) = db_with_customer().await;
        let repo = db.accounts();

        repo.insert_if_no_active(&create_draft(customer_id, "Bulevar Niza"), 1_000_000_001)
            .await
            .unwrap();

        let rows = repo.list_all_with_owner_names().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.as_deref(), Some("Cliente 1"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
