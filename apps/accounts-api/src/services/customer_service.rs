//! # Customer Service
//!
//! Signup, profile edit, deletion and lookups for customers.
//!
//! ## Uniqueness Checks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create / update                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  email taken (by someone else)?          ── yes ──► AlreadyExists       │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  mobile number taken?                    ── yes ──► AlreadyExists       │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  document number taken?                  ── yes ──► AlreadyExists       │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  (update only) customer exists?          ── no ───► NotFound            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write ── UNIQUE constraint lost a race? ── yes ──► AlreadyExists       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use crate::services::{ServiceError, ServiceResult};
use accounts_core::validation::{validate_customer_draft, validate_search_term};
use accounts_core::{AccountView, CoreError, Customer, CustomerDraft, CustomerView};
use accounts_db::{Database, DbError};

const ENTITY: &str = "Customer";

/// Consistency rules for customers.
#[derive(Debug, Clone)]
pub struct CustomerService {
    db: Database,
}

impl CustomerService {
    pub fn new(db: Database) -> Self {
        CustomerService { db }
    }

    /// Registers a new customer.
    ///
    /// ## Errors
    /// * `Validation` - Malformed draft
    /// * `AlreadyExists` - Email, mobile number or document number taken
    pub async fn create(&self, draft: &CustomerDraft) -> ServiceResult<CustomerView> {
        validate_customer_draft(draft)?;
        self.ensure_unique(draft, None).await?;

        let customer = self
            .db
            .customers()
            .insert(draft)
            .await
            .map_err(|e| duplicate_to_already_exists(e, draft))?;

        info!(customer_id = customer.customer_id, "Customer created");
        Ok(CustomerView::new(customer, None))
    }

    /// Overwrites a customer's profile.
    ///
    /// Uniqueness is checked before existence, so a taken email on an
    /// unknown customer reports `AlreadyExists`.
    ///
    /// ## Returns
    /// `false` if the row vanished between the existence check and the write.
    pub async fn update(&self, customer_id: i64, draft: &CustomerDraft) -> ServiceResult<bool> {
        validate_customer_draft(draft)?;
        self.ensure_unique(draft, Some(customer_id)).await?;

        let customers = self.db.customers();
        if customers.get_by_id(customer_id).await?.is_none() {
            return Err(CoreError::not_found(ENTITY, "customerId", customer_id).into());
        }

        let updated = customers
            .update(customer_id, draft)
            .await
            .map_err(|e| duplicate_to_already_exists(e, draft))?;

        if updated {
            info!(customer_id, "Customer updated");
        }
        Ok(updated)
    }

    /// Deletes a customer together with all of its accounts.
    pub async fn delete(&self, customer_id: i64) -> ServiceResult<bool> {
        let customers = self.db.customers();
        if customers.get_by_id(customer_id).await?.is_none() {
            return Err(CoreError::not_found(ENTITY, "customerId", customer_id).into());
        }

        let deleted = customers.delete_with_accounts(customer_id).await?;
        if deleted {
            info!(customer_id, "Customer deleted");
        }
        Ok(deleted)
    }

    // -------------------------------------------------------------------------
    // Exact lookups
    // -------------------------------------------------------------------------

    pub async fn get_by_id(&self, customer_id: i64) -> ServiceResult<CustomerView> {
        match self.db.customers().get_by_id(customer_id).await? {
            Some(customer) => self.to_view(customer).await,
            None => Err(CoreError::not_found(ENTITY, "customerId", customer_id).into()),
        }
    }

    pub async fn get_by_email(&self, email: &str) -> ServiceResult<CustomerView> {
        match self.db.customers().get_by_email(email).await? {
            Some(customer) => self.to_view(customer).await,
            None => Err(CoreError::not_found(ENTITY, "email", email).into()),
        }
    }

    pub async fn get_by_mobile_number(&self, mobile_number: &str) -> ServiceResult<CustomerView> {
        match self.db.customers().get_by_mobile_number(mobile_number).await? {
            Some(customer) => self.to_view(customer).await,
            None => Err(CoreError::not_found(ENTITY, "mobileNumber", mobile_number).into()),
        }
    }

    // -------------------------------------------------------------------------
    // Listings (empty is not an error, except for list_all)
    // -------------------------------------------------------------------------

    pub async fn search_by_email(&self, term: &str) -> ServiceResult<Vec<CustomerView>> {
        let term = validate_search_term(term)?;
        let customers = self.db.customers().search_by_email(&term).await?;
        self.to_views(customers).await
    }

    pub async fn search_by_mobile_number(&self, term: &str) -> ServiceResult<Vec<CustomerView>> {
        let term = validate_search_term(term)?;
        let customers = self.db.customers().search_by_mobile_number(&term).await?;
        self.to_views(customers).await
    }

    pub async fn search_by_document_number(&self, term: &str) -> ServiceResult<Vec<CustomerView>> {
        let term = validate_search_term(term)?;
        let customers = self.db.customers().search_by_document_number(&term).await?;
        self.to_views(customers).await
    }

    pub async fn search_by_name(&self, term: &str) -> ServiceResult<Vec<CustomerView>> {
        let term = validate_search_term(term)?;
        let customers = self.db.customers().search_by_name(&term).await?;
        self.to_views(customers).await
    }

    /// Lists every customer; an empty store reports `NotFound`.
    pub async fn list_all(&self) -> ServiceResult<Vec<CustomerView>> {
        let customers = self.db.customers().list_all().await?;
        if customers.is_empty() {
            return Err(CoreError::not_found(ENTITY, "customer", "All").into());
        }
        self.to_views(customers).await
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Fails if another customer (not `exclude`) holds any unique value.
    async fn ensure_unique(&self, draft: &CustomerDraft, exclude: Option<i64>) -> ServiceResult<()> {
        let customers = self.db.customers();
        let taken_by_other =
            |found: Option<Customer>| found.is_some_and(|c| Some(c.customer_id) != exclude);

        if taken_by_other(customers.get_by_email(&draft.email).await?) {
            warn!(email = %draft.email, "Email already registered");
            return Err(already_registered("email", &draft.email));
        }

        if taken_by_other(customers.get_by_mobile_number(&draft.mobile_number).await?) {
            warn!(mobile_number = %draft.mobile_number, "Mobile number already registered");
            return Err(already_registered("mobile number", &draft.mobile_number));
        }

        if taken_by_other(customers.get_by_document_number(&draft.document_number).await?) {
            warn!(document_number = %draft.document_number, "Document number already registered");
            return Err(already_registered("document number", &draft.document_number));
        }

        Ok(())
    }

    /// Enriches a customer with its Active account.
    async fn to_view(&self, customer: Customer) -> ServiceResult<CustomerView> {
        let current_account = self
            .db
            .accounts()
            .find_active_by_customer(customer.customer_id)
            .await?
            .map(AccountView::from);

        Ok(CustomerView::new(customer, current_account))
    }

    async fn to_views(&self, customers: Vec<Customer>) -> ServiceResult<Vec<CustomerView>> {
        let mut views = Vec::with_capacity(customers.len());
        for customer in customers {
            views.push(self.to_view(customer).await?);
        }
        Ok(views)
    }
}

fn already_registered(what: &str, value: &str) -> ServiceError {
    CoreError::already_exists(
        ENTITY,
        format!("Customer already registered with given {} {}", what, value.trim()),
    )
    .into()
}

/// Reports a UNIQUE violation that slipped past `ensure_unique` (a racing
/// writer) the same way the pre-check would have.
fn duplicate_to_already_exists(err: DbError, draft: &CustomerDraft) -> ServiceError {
    if err.is_unique_violation_on("customers.email") {
        already_registered("email", &draft.email)
    } else if err.is_unique_violation_on("customers.mobile_number") {
        already_registered("mobile number", &draft.mobile_number)
    } else if err.is_unique_violation_on("customers.document_number") {
        already_registered("document number", &draft.document_number)
    } else {
        err.into()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use accounts_core::{AccountCreateDraft, ValidationError};
    use accounts_db::DbConfig;

    async fn service() -> CustomerService {
        CustomerService::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    fn cliente(n: u32) -> CustomerDraft {
        CustomerDraft {
            document_type: "CC".to_string(),
            document_number: format!("1112223{n}"),
            name: format!("Cliente {n}"),
            email: format!("cliente{n}@correo.com"),
            mobile_number: format!("111222333{n}"),
        }
    }

    fn already_exists_message(err: ServiceError) -> String {
        match err {
            ServiceError::Core(CoreError::AlreadyExists { message, .. }) => message,
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_by_id_round_trips() {
        let service = service().await;

        let created = service.create(&cliente(1)).await.unwrap();
        assert_eq!(created.customer_id, 1);
        assert!(created.current_account.is_none());

        let fetched = service.get_by_id(1).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.email, "cliente1@correo.com");
        assert_eq!(fetched.document_type, "CC");
    }

    #[tokio::test]
    async fn test_create_rejects_each_duplicate_in_order() {
        let service = service().await;
        service.create(&cliente(1)).await.unwrap();

        // Same email and mobile: email is reported first
        let mut draft = cliente(2);
        draft.email = "cliente1@correo.com".to_string();
        draft.mobile_number = "1112223331".to_string();
        let message = already_exists_message(service.create(&draft).await.unwrap_err());
        assert_eq!(
            message,
            "Customer already registered with given email cliente1@correo.com"
        );

        let mut draft = cliente(2);
        draft.mobile_number = "1112223331".to_string();
        let message = already_exists_message(service.create(&draft).await.unwrap_err());
        assert!(message.contains("mobile number 1112223331"));

        let mut draft = cliente(2);
        draft.document_number = "11122231".to_string();
        let message = already_exists_message(service.create(&draft).await.unwrap_err());
        assert!(message.contains("document number 11122231"));

        assert!(service.create(&cliente(2)).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_validates_draft() {
        let service = service().await;
        let mut draft = cliente(1);
        draft.mobile_number = "123".to_string();

        let err = service.create(&draft).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
    }

    #[tokio::test]
    async fn test_update_excludes_self_from_uniqueness() {
        let service = service().await;
        service.create(&cliente(1)).await.unwrap();
        service.create(&cliente(2)).await.unwrap();

        // Keeping its own email is fine
        let mut draft = cliente(1);
        draft.name = "Cliente Uno".to_string();
        assert!(service.update(1, &draft).await.unwrap());
        assert_eq!(service.get_by_id(1).await.unwrap().name, "Cliente Uno");

        // Taking customer 2's email is not
        let mut draft = cliente(1);
        draft.email = "cliente2@correo.com".to_string();
        let err = service.update(1, &draft).await.unwrap_err();
        assert!(already_exists_message(err).contains("email"));
    }

    #[tokio::test]
    async fn test_update_checks_uniqueness_before_existence() {
        let service = service().await;
        service.create(&cliente(1)).await.unwrap();

        let err = service.update(99, &cliente(1)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::AlreadyExists { .. })
        ));

        let err = service.update(99, &cliente(3)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_removes_customer_and_accounts() {
        let service = service().await;
        let db = service.db.clone();
        service.create(&cliente(1)).await.unwrap();
        db.accounts()
            .insert_if_no_active(
                &AccountCreateDraft {
                    customer_id: 1,
                    account_type: "Savings".to_string(),
                    branch_name: "Bulevar Niza".to_string(),
                },
                1_000_000_001,
            )
            .await
            .unwrap();

        assert!(service.delete(1).await.unwrap());
        assert!(matches!(
            service.get_by_id(1).await.unwrap_err(),
            ServiceError::Core(CoreError::NotFound { .. })
        ));
        assert!(db.accounts().list_by_customer(1).await.unwrap().is_empty());

        assert!(matches!(
            service.delete(1).await.unwrap_err(),
            ServiceError::Core(CoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_views_carry_active_account() {
        let service = service().await;
        service.create(&cliente(1)).await.unwrap();
        service
            .db
            .accounts()
            .insert_if_no_active(
                &AccountCreateDraft {
                    customer_id: 1,
                    account_type: "Savings".to_string(),
                    branch_name: "Bulevar Niza".to_string(),
                },
                1_234_567_890,
            )
            .await
            .unwrap();

        let view = service.get_by_email("cliente1@correo.com").await.unwrap();
        let account = view.current_account.unwrap();
        assert_eq!(account.account_number, 1_234_567_890);
        assert_eq!(account.account_status, "Active");
    }

    #[tokio::test]
    async fn test_lookups_and_searches() {
        let service = service().await;

        assert!(matches!(
            service.list_all().await.unwrap_err(),
            ServiceError::Core(CoreError::NotFound { .. })
        ));

        service.create(&cliente(1)).await.unwrap();
        service.create(&cliente(2)).await.unwrap();

        assert_eq!(service.list_all().await.unwrap().len(), 2);
        assert_eq!(
            service.get_by_mobile_number("1112223332").await.unwrap().customer_id,
            2
        );
        assert!(matches!(
            service.get_by_email("nadie@correo.com").await.unwrap_err(),
            ServiceError::Core(CoreError::NotFound { .. })
        ));

        assert_eq!(service.search_by_email("CLIENTE").await.unwrap().len(), 2);
        assert_eq!(service.search_by_name("cliente 1").await.unwrap().len(), 1);
        assert_eq!(service.search_by_document_number("2232").await.unwrap().len(), 1);
        assert_eq!(service.search_by_mobile_number("333").await.unwrap().len(), 2);

        // Substring searches never report NotFound
        assert!(service.search_by_name("Perez").await.unwrap().is_empty());

        // Blank terms are rejected instead of matching everything
        assert!(matches!(
            service.search_by_name("  ").await.unwrap_err(),
            ServiceError::Core(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_store_unique_violations_read_as_already_exists() {
        let draft = cliente(1);

        let cases = [
            ("customers.email", "email cliente1@correo.com"),
            ("customers.mobile_number", "mobile number 1112223331"),
            ("customers.document_number", "document number 11122231"),
        ];
        for (column, expected) in cases {
            let err = duplicate_to_already_exists(DbError::duplicate(column, "x"), &draft);
            assert_eq!(
                already_exists_message(err),
                format!("Customer already registered with given {expected}")
            );
        }

        let err = duplicate_to_already_exists(DbError::duplicate("accounts.account_number", "x"), &draft);
        assert!(matches!(err, ServiceError::Db(DbError::UniqueViolation { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_signups_register_one_customer() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("accounts.db")).max_connections(8))
            .await
            .unwrap();
        let service = CustomerService::new(db);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move { service.create(&cliente(1)).await }));
        }

        let mut registered = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => registered += 1,
                Err(err) => {
                    already_exists_message(err);
                }
            }
        }

        assert_eq!(registered, 1);
        assert_eq!(service.list_all().await.unwrap().len(), 1);
    }
}
