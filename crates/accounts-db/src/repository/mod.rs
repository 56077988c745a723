//! # Repository Module
//!
//! Database repository implementations for the accounts service.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CustomerService / AccountService                                      │
//! │       │                                                                 │
//! │       │  db.customers().get_by_email("a@b.co")                         │
//! │       ▼                                                                 │
//! │  CustomerRepository              AccountRepository                     │
//! │  ├── get_by_id / email / mobile  ├── get_by_id                         │
//! │  ├── search_by_* (substring)     ├── find_active_by_customer           │
//! │  ├── insert / update             ├── search_by_* (substring)           │
//! │  └── delete_with_accounts        ├── insert_if_no_active               │
//! │                                  └── update / delete                   │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer CRUD and search
//! - [`AccountRepository`](account::AccountRepository) - Account CRUD, search, Active guard

pub mod account;
pub mod customer;

/// Lowercases a value for the `*_folded` search columns.
///
/// Stored values and search terms go through the same folding, so matching
/// ignores case beyond ASCII.
///
/// ## Example
/// ```rust
/// use accounts_db::repository::fold;
///
/// assert_eq!(fold(" ÁLVARO NÚÑEZ "), "álvaro núñez");
/// ```
pub fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Builds a `LIKE` pattern matching `term` anywhere in the column.
///
/// `%`, `_` and the escape character itself are escaped, so user input is
/// matched literally. Queries must declare `ESCAPE '\'`.
///
/// ## Example
/// ```rust
/// use accounts_db::repository::contains_pattern;
///
/// assert_eq!(contains_pattern("niza"), "%niza%");
/// assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
/// ```
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern(""), "%%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
        assert_eq!(contains_pattern("Bulevar Niza"), "%Bulevar Niza%");
    }

    #[test]
    fn test_fold_lowercases_non_ascii() {
        assert_eq!(fold("NÚÑEZ"), fold("núñez"));
        assert_eq!(fold("Peña"), "peña");
        assert_eq!(fold("  CC "), "cc");
    }
}
