//! SQL statement gate for the execute route.
//!
//! This is a textual prefix check, not a parser. Text such as
//! `select 1; drop table t`, a leading comment or a `WITH ... ` CTE is not
//! inspected beyond its first word.

use crate::errors::AppError;

/// Message returned when a statement is rejected.
pub const ONLY_SELECT_ALLOWED: &str = "Only SELECT queries are allowed";

/// Validates SQL statements before they reach the database.
pub struct SqlValidator;

impl SqlValidator {
    /// Checks if the SQL starts with `select`, ignoring surrounding
    /// whitespace and case.
    pub fn is_select(sql: &str) -> bool {
        sql.trim().to_lowercase().starts_with("select")
    }

    /// Lets only SELECT statements through.
    ///
    /// # Errors
    /// Returns `AppError::UnsafeSql` if the statement does not start with `select`.
    pub fn ensure_read_only(sql: &str) -> Result<(), AppError> {
        if Self::is_select(sql) {
            Ok(())
        } else {
            Err(AppError::UnsafeSql(ONLY_SELECT_ALLOWED.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_is_allowed() {
        assert!(SqlValidator::ensure_read_only("SELECT * FROM users").is_ok());
        assert!(SqlValidator::ensure_read_only("  \n\tselect 1 as x").is_ok());
    }

    #[test]
    fn test_drop_is_forbidden() {
        let err = SqlValidator::ensure_read_only("DROP TABLE foo").unwrap_err();
        assert_eq!(err.to_string(), ONLY_SELECT_ALLOWED);
    }

    #[test]
    fn test_prefix_only() {
        // Only the first word is looked at.
        assert!(SqlValidator::is_select("select 1; delete from users"));
        assert!(SqlValidator::is_select("selectivity_report"));
        assert!(!SqlValidator::is_select("WITH t AS (SELECT 1) SELECT * FROM t"));
        assert!(!SqlValidator::is_select("-- note\nSELECT 1"));
        assert!(!SqlValidator::is_select("   "));
    }
}
