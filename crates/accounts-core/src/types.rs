//! # Domain Types
//!
//! Core domain types used throughout the accounts service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ROWS (stored)            DRAFTS (inbound)          VIEWS (outbound)    │
//! │  ─────────────            ────────────────          ────────────────    │
//! │  Customer ◄────────────── CustomerDraft             CustomerView        │
//! │   customer_id                                        └─ currentAccount? │
//! │   email (unique)                                                        │
//! │   mobile_number (unique)                                                │
//! │   document_number (unique)                                              │
//! │        │ 1                                                              │
//! │        │                                                                │
//! │        │ n                                                              │
//! │  Account ◄─────────────── AccountCreateDraft        AccountView         │
//! │   account_id              AccountUpdateDraft         └─ ownerName?      │
//! │   customer_id (FK)                                                      │
//! │   account_number (generated)                                            │
//! │   account_status ("Active" / other)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows carry audit timestamps; drafts carry only what a caller may set;
//! views are what leaves the service (camelCase JSON).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ACTIVE_STATUS;

// =============================================================================
// Customer
// =============================================================================

/// A stored customer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Identity assigned by the store on insert.
    pub customer_id: i64,

    /// Kind of legal document (CC, CE, PAS, ...).
    pub document_type: String,

    /// Document number, unique across customers.
    pub document_number: String,

    pub name: String,

    /// Unique across customers.
    pub email: String,

    /// Unique across customers.
    pub mobile_number: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied customer data for signup and profile edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub document_type: String,
    pub document_number: String,
    pub name: String,
    pub email: String,
    pub mobile_number: String,
}

/// Read projection of a customer, enriched with its Active account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub customer_id: i64,
    pub document_type: String,
    pub document_number: String,
    pub name: String,
    pub email: String,
    pub mobile_number: String,

    /// The customer's Active account, if it has one.
    pub current_account: Option<AccountView>,
}

impl CustomerView {
    /// Builds the view from a stored row and its (optional) Active account.
    pub fn new(customer: Customer, current_account: Option<AccountView>) -> Self {
        CustomerView {
            customer_id: customer.customer_id,
            document_type: customer.document_type,
            document_number: customer.document_number,
            name: customer.name,
            email: customer.email,
            mobile_number: customer.mobile_number,
            current_account,
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// A stored account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Identity assigned by the store on insert.
    pub account_id: i64,

    /// Owning customer. Never changes after creation.
    pub customer_id: i64,

    /// System-generated 10-digit number.
    pub account_number: i64,

    pub account_type: String,
    pub branch_name: String,

    /// Free-form status; only [`ACTIVE_STATUS`] has meaning.
    pub account_status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Checks if this is the customer's canonical (Active) account.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.account_status == ACTIVE_STATUS
    }
}

/// Caller-supplied data for opening an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountCreateDraft {
    pub customer_id: i64,
    pub account_type: String,
    pub branch_name: String,
}

/// Caller-supplied data for editing an account.
///
/// `customer_id` must repeat the current owner; it is a guard, not a
/// mutable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdateDraft {
    pub customer_id: i64,
    pub account_type: String,
    pub branch_name: String,
    pub account_status: String,
}

/// Read projection of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub account_id: i64,
    pub customer_id: i64,
    pub account_number: i64,
    pub account_type: String,
    pub branch_name: String,
    pub account_status: String,

    /// Owner's display name, only filled by the all-accounts listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub owner_name: Option<String>,
}

impl AccountView {
    /// Attaches the owner's display name.
    pub fn with_owner_name(mut self, owner_name: Option<String>) -> Self {
        self.owner_name = owner_name;
        self
    }
}

impl From<Account> for AccountView {
    fn from(a: Account) -> Self {
        AccountView {
            account_id: a.account_id,
            customer_id: a.customer_id,
            account_number: a.account_number,
            account_type: a.account_type,
            branch_name: a.branch_name,
            account_status: a.account_status,
            owner_name: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn account(status: &str) -> Account {
        let now = Utc::now();
        Account {
            account_id: 1,
            customer_id: 1,
            account_number: 1_234_567_890,
            account_type: "Savings".to_string(),
            branch_name: "Bulevar Niza".to_string(),
            account_status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_is_active_is_exact_match() {
        assert!(account("Active").is_active());
        assert!(!account("active").is_active());
        assert!(!account("Inactive").is_active());
    }

    #[test]
    fn test_account_view_serializes_camel_case() {
        let view = AccountView::from(account("Active"));
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["accountNumber"], 1_234_567_890_i64);
        assert_eq!(json["branchName"], "Bulevar Niza");
        // ownerName is omitted unless the listing join filled it
        assert!(json.get("ownerName").is_none());

        let json = serde_json::to_value(view.with_owner_name(Some("Cliente 1".into()))).unwrap();
        assert_eq!(json["ownerName"], "Cliente 1");
    }

    #[test]
    fn test_customer_view_carries_current_account() {
        let now = Utc::now();
        let customer = Customer {
            customer_id: 7,
            document_type: "CC".to_string(),
            document_number: "11122233".to_string(),
            name: "Cliente 1".to_string(),
            email: "cliente1@correo.com".to_string(),
            mobile_number: "1112223333".to_string(),
            created_at: now,
            updated_at: now,
        };

        let view = CustomerView::new(customer.clone(), None);
        assert_eq!(view.customer_id, 7);
        assert!(view.current_account.is_none());

        let view = CustomerView::new(customer, Some(AccountView::from(account("Active"))));
        assert_eq!(view.current_account.unwrap().account_status, "Active");
    }

    #[test]
    fn test_customer_draft_deserializes_camel_case() {
        let draft: CustomerDraft = serde_json::from_str(
            r#"{
                "documentType": "CC",
                "documentNumber": "11122233",
                "name": "Cliente 1",
                "email": "cliente1@correo.com",
                "mobileNumber": "1112223333"
            }"#,
        )
        .unwrap();

        assert_eq!(draft.document_number, "11122233");
        assert_eq!(draft.mobile_number, "1112223333");
    }
}
