//! # Account Service
//!
//! Opening, editing, closing and listing accounts.
//!
//! ## Opening an Account
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(draft)                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  customer exists? ───────────── no ──► NotFound                         │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  generate 10-digit number                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert_if_no_active ──┬── inserted ─────────────► AccountView          │
//! │       ▲                ├── guard tripped ────────► AlreadyExists        │
//! │       │                ├── FK violation ─────────► NotFound (raced)     │
//! │       └─ retry ◄───────┴── number collided (up to 5 attempts)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use crate::services::ServiceResult;
use accounts_core::validation::{
    validate_account_create_draft, validate_account_update_draft, validate_search_term,
};
use accounts_core::{Account, AccountCreateDraft, AccountUpdateDraft, AccountView, CoreError};
use accounts_db::{generate_account_number, Database, DbError};

const ENTITY: &str = "Account";

/// Attempts at drawing a free account number before giving up.
const ACCOUNT_NUMBER_ATTEMPTS: usize = 5;

/// Consistency rules for accounts.
#[derive(Debug, Clone)]
pub struct AccountService {
    db: Database,
}

impl AccountService {
    pub fn new(db: Database) -> Self {
        AccountService { db }
    }

    /// Opens an Active account for an existing customer.
    ///
    /// ## Errors
    /// * `Validation` - Malformed draft
    /// * `NotFound` - Customer does not exist
    /// * `AlreadyExists` - Customer already owns an Active account
    /// * `Db(UniqueViolation)` - Every generated number collided
    pub async fn create(&self, draft: &AccountCreateDraft) -> ServiceResult<AccountView> {
        validate_account_create_draft(draft)?;

        let customer_id = draft.customer_id;
        if self.db.customers().get_by_id(customer_id).await?.is_none() {
            return Err(CoreError::not_found("Customer", "customerId", customer_id).into());
        }

        self.open(draft, generate_account_number).await
    }

    /// Insert loop behind [`create`](Self::create), drawing numbers from
    /// `next_number` until one is free or the attempts run out.
    async fn open(
        &self,
        draft: &AccountCreateDraft,
        mut next_number: impl FnMut() -> i64,
    ) -> ServiceResult<AccountView> {
        let customer_id = draft.customer_id;
        let accounts = self.db.accounts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let account_number = next_number();

            match accounts.insert_if_no_active(draft, account_number).await {
                Ok(Some(account)) => {
                    info!(
                        account_id = account.account_id,
                        customer_id, account_number, "Account created"
                    );
                    return Ok(AccountView::from(account));
                }
                Ok(None) => {
                    warn!(customer_id, "Customer already has an Active account");
                    return Err(CoreError::already_exists(
                        ENTITY,
                        format!("Account already registered with given customer id {customer_id}"),
                    )
                    .into());
                }
                Err(e)
                    if e.is_unique_violation_on("accounts.account_number")
                        && attempt < ACCOUNT_NUMBER_ATTEMPTS =>
                {
                    warn!(account_number, attempt, "Account number collision, retrying");
                }
                // Customer deleted between the check and the insert
                Err(DbError::ForeignKeyViolation { .. }) => {
                    return Err(CoreError::not_found("Customer", "customerId", customer_id).into());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Overwrites type, branch and status of an account.
    ///
    /// `draft.customer_id` must name the current owner. Setting the status to
    /// "Active" does not re-check the single-Active rule.
    ///
    /// ## Returns
    /// `false` if the row vanished between the lookup and the write.
    pub async fn update(&self, account_id: i64, draft: &AccountUpdateDraft) -> ServiceResult<bool> {
        validate_account_update_draft(draft)?;

        let account = self.require_account(account_id).await?;
        let owner_id = account.customer_id;

        if self.db.customers().get_by_id(owner_id).await?.is_none() {
            return Err(CoreError::not_found("Customer", "customerId", owner_id).into());
        }

        if draft.customer_id != owner_id {
            warn!(
                account_id,
                owner_id,
                requested = draft.customer_id,
                "Rejected account ownership change"
            );
            return Err(CoreError::already_exists(
                ENTITY,
                format!("Bad request with customer id {owner_id}"),
            )
            .into());
        }

        let updated = self.db.accounts().update(account_id, draft).await?;
        if updated {
            info!(account_id, status = %draft.account_status, "Account updated");
        }
        Ok(updated)
    }

    /// Deletes one account regardless of its status.
    pub async fn delete(&self, account_id: i64) -> ServiceResult<bool> {
        self.require_account(account_id).await?;

        let deleted = self.db.accounts().delete(account_id).await?;
        if deleted {
            info!(account_id, "Account deleted");
        }
        Ok(deleted)
    }

    // -------------------------------------------------------------------------
    // Lookups (empty results are NotFound)
    // -------------------------------------------------------------------------

    /// The customer's Active account.
    pub async fn current_account(&self, customer_id: i64) -> ServiceResult<AccountView> {
        if self.db.customers().get_by_id(customer_id).await?.is_none() {
            return Err(CoreError::not_found("Customer", "customerId", customer_id).into());
        }

        match self.db.accounts().find_active_by_customer(customer_id).await? {
            Some(account) => Ok(AccountView::from(account)),
            None => Err(CoreError::not_found(ENTITY, "customerId", customer_id).into()),
        }
    }

    /// Every account of a customer, any status.
    pub async fn list_by_customer(&self, customer_id: i64) -> ServiceResult<Vec<AccountView>> {
        let accounts = self.db.accounts().list_by_customer(customer_id).await?;
        non_empty(accounts, "customerId", customer_id)
    }

    pub async fn search_by_branch_name(&self, term: &str) -> ServiceResult<Vec<AccountView>> {
        let term = validate_search_term(term)?;
        let accounts = self.db.accounts().search_by_branch_name(&term).await?;
        non_empty(accounts, "branchName", term)
    }

    pub async fn search_by_account_type(&self, term: &str) -> ServiceResult<Vec<AccountView>> {
        let term = validate_search_term(term)?;
        let accounts = self.db.accounts().search_by_account_type(&term).await?;
        non_empty(accounts, "accountType", term)
    }

    pub async fn search_by_account_status(&self, term: &str) -> ServiceResult<Vec<AccountView>> {
        let term = validate_search_term(term)?;
        let accounts = self.db.accounts().search_by_account_status(&term).await?;
        non_empty(accounts, "accountStatus", term)
    }

    /// Every account with its owner's name; an owner that no longer
    /// resolves leaves `ownerName` unset.
    pub async fn list_all(&self) -> ServiceResult<Vec<AccountView>> {
        let rows = self.db.accounts().list_all_with_owner_names().await?;

        Ok(rows
            .into_iter()
            .map(|(account, owner_name)| AccountView::from(account).with_owner_name(owner_name))
            .collect())
    }

    async fn require_account(&self, account_id: i64) -> ServiceResult<Account> {
        match self.db.accounts().get_by_id(account_id).await? {
            Some(account) => Ok(account),
            None => Err(CoreError::not_found(ENTITY, "accountId", account_id).into()),
        }
    }
}

fn non_empty(
    accounts: Vec<Account>,
    field: &str,
    value: impl ToString,
) -> ServiceResult<Vec<AccountView>> {
    if accounts.is_empty() {
        return Err(CoreError::not_found(ENTITY, field, value).into());
    }
    Ok(accounts.into_iter().map(AccountView::from).collect())
}

// =============================================================================
// Unit Tests
// =============================================================================
