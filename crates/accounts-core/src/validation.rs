//! # Validation Module
//!
//! Draft validation for the accounts service.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extraction (axum Json / Path)                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── Missing fields, wrong JSON types                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Presence, length and pattern rules per field                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Consistency rules (services)                                 │
//! │  ├── Uniqueness of email / mobile / document                           │
//! │  └── Single Active account, ownership                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use accounts_core::validation::validate_search_term;
//!
//! assert_eq!(validate_search_term("  niza ").unwrap(), "niza");
//! assert!(validate_search_term("   ").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{AccountCreateDraft, AccountUpdateDraft, CustomerDraft};
use crate::MAX_SEARCH_TERM_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Draft Validators
// =============================================================================

/// Validates a customer draft (signup and profile edit share the rules).
///
/// ## Rules
/// - `documentType`: 2-3 characters
/// - `documentNumber`: 8-15 characters
/// - `name`: 5-100 characters
/// - `email`: well-formed address
/// - `mobileNumber`: exactly 10 digits
///
/// ## Example
/// ```rust
/// use accounts_core::validation::validate_customer_draft;
/// use accounts_core::CustomerDraft;
///
/// let mut draft = CustomerDraft {
///     document_type: "CC".into(),
///     document_number: "49555111".into(),
///     name: "Pepito Perez".into(),
///     email: "pperez@correo.com".into(),
///     mobile_number: "3204445555".into(),
/// };
/// assert!(validate_customer_draft(&draft).is_ok());
///
/// draft.mobile_number = "320-444".into();
/// assert!(validate_customer_draft(&draft).is_err());
/// ```
pub fn validate_customer_draft(draft: &CustomerDraft) -> ValidationResult<()> {
    validate_length("documentType", &draft.document_type, 2, 3)?;
    validate_length("documentNumber", &draft.document_number, 8, 15)?;
    validate_length("name", &draft.name, 5, 100)?;
    validate_email(&draft.email)?;
    validate_mobile_number(&draft.mobile_number)?;
    Ok(())
}

/// Validates an account opening draft.
///
/// ## Rules
/// - `customerId`: positive
/// - `accountType`: 1-50 characters
/// - `branchName`: 5-100 characters
pub fn validate_account_create_draft(draft: &AccountCreateDraft) -> ValidationResult<()> {
    validate_customer_id(draft.customer_id)?;
    validate_length("accountType", &draft.account_type, 1, 50)?;
    validate_length("branchName", &draft.branch_name, 5, 100)?;
    Ok(())
}

/// Validates an account edit draft.
///
/// Same as [`validate_account_create_draft`] plus `accountStatus`
/// (5-10 characters, e.g. "Active" or "Inactive").
pub fn validate_account_update_draft(draft: &AccountUpdateDraft) -> ValidationResult<()> {
    validate_customer_id(draft.customer_id)?;
    validate_length("accountType", &draft.account_type, 1, 50)?;
    validate_length("branchName", &draft.branch_name, 5, 100)?;
    validate_length("accountStatus", &draft.account_status, 5, 10)?;
    Ok(())
}

/// Validates a free-text search term.
///
/// ## Rules
/// - Must not be empty after trimming (an empty term would match everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed term.
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    let term = term.trim();

    if term.is_empty() {
        return Err(ValidationError::Required {
            field: "search term".to_string(),
        });
    }

    if term.chars().count() > MAX_SEARCH_TERM_LEN {
        return Err(ValidationError::TooLong {
            field: "search term".to_string(),
            max: MAX_SEARCH_TERM_LEN,
        });
    }

    Ok(term.to_string())
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates that a trimmed field is present and within `[min, max]` chars.
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let len = value.chars().count();

    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }

    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@`, non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace anywhere
///
/// ## Example
/// ```rust
/// use accounts_core::validation::validate_email;
///
/// assert!(validate_email("cliente1@correo.com").is_ok());
/// assert!(validate_email("cliente1.correo.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must be of the form name@domain"));
    }

    match domain.rfind('.') {
        Some(pos) if pos > 0 && pos < domain.len() - 1 && !domain.starts_with('.') => Ok(()),
        _ => Err(invalid("domain must contain a dot")),
    }
}

/// Validates a mobile number: exactly 10 ASCII digits.
pub fn validate_mobile_number(mobile: &str) -> ValidationResult<()> {
    let mobile = mobile.trim();

    if mobile.is_empty() {
        return Err(ValidationError::Required {
            field: "mobileNumber".to_string(),
        });
    }

    if mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "mobileNumber".to_string(),
            reason: "must be 10 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a customer reference in an account draft.
pub fn validate_customer_id(customer_id: i64) -> ValidationResult<()> {
    if customer_id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "customerId".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn customer_draft() -> CustomerDraft {
        CustomerDraft {
            document_type: "CC".to_string(),
            document_number: "11122233".to_string(),
            name: "Cliente 1".to_string(),
            email: "cliente1@correo.com".to_string(),
            mobile_number: "1112223333".to_string(),
        }
    }

    #[test]
    fn test_validate_customer_draft() {
        assert!(validate_customer_draft(&customer_draft()).is_ok());

        let mut draft = customer_draft();
        draft.document_type = "C".to_string();
        assert!(matches!(
            validate_customer_draft(&draft),
            Err(ValidationError::TooShort { .. })
        ));

        let mut draft = customer_draft();
        draft.document_type = "PASS".to_string();
        assert!(matches!(
            validate_customer_draft(&draft),
            Err(ValidationError::TooLong { .. })
        ));

        let mut draft = customer_draft();
        draft.name = "Ana".to_string();
        assert!(validate_customer_draft(&draft).is_err());

        let mut draft = customer_draft();
        draft.document_number = "1234567".to_string();
        assert!(validate_customer_draft(&draft).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("cliente1@correo.com").is_ok());
        assert!(validate_email("a.b+c@sub.example.org").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("@correo.com").is_err());
        assert!(validate_email("a@b@correo.com").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email("a@correo.").is_err());
        assert!(validate_email("a b@correo.com").is_err());
    }

    #[test]
    fn test_validate_mobile_number() {
        assert!(validate_mobile_number("3204445555").is_ok());

        assert!(validate_mobile_number("").is_err());
        assert!(validate_mobile_number("320444555").is_err());
        assert!(validate_mobile_number("32044455556").is_err());
        assert!(validate_mobile_number("320444555a").is_err());
    }

    #[test]
    fn test_validate_account_drafts() {
        let draft = AccountCreateDraft {
            customer_id: 1,
            account_type: "Savings".to_string(),
            branch_name: "Bulevar Niza".to_string(),
        };
        assert!(validate_account_create_draft(&draft).is_ok());

        let bad = AccountCreateDraft {
            customer_id: 0,
            ..draft.clone()
        };
        assert!(matches!(
            validate_account_create_draft(&bad),
            Err(ValidationError::MustBePositive { .. })
        ));

        let bad = AccountCreateDraft {
            branch_name: "Nza".to_string(),
            ..draft
        };
        assert!(validate_account_create_draft(&bad).is_err());

        let update = AccountUpdateDraft {
            customer_id: 1,
            account_type: "Savings".to_string(),
            branch_name: "Bulevar Niza".to_string(),
            account_status: "Inactive".to_string(),
        };
        assert!(validate_account_update_draft(&update).is_ok());

        let bad = AccountUpdateDraft {
            account_status: "Closed-forever".to_string(),
            ..update
        };
        assert!(validate_account_update_draft(&bad).is_err());
    }

    #[test]
    fn test_validate_search_term() {
        assert_eq!(validate_search_term(" Niza ").unwrap(), "Niza");
        assert!(validate_search_term("").is_err());
        assert!(validate_search_term(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 5 characters, 7 bytes
        assert!(validate_length("name", "Óscar", 5, 100).is_ok());
        assert!(validate_length("name", "Núñez", 5, 5).is_ok());
    }
}
