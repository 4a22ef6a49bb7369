//! Schema catalog models.
//!
//! Request bodies for the column and table searches and the shapes they
//! return.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Turns an optional search term into an ILIKE pattern.
///
/// A missing or empty term matches everything. `%` and `_` inside the term
/// keep their wildcard meaning.
pub fn search_pattern(term: Option<&str>) -> String {
    match term {
        Some(term) if !term.is_empty() => format!("%{}%", term),
        _ => "%".to_string(),
    }
}

/// Request body for searching columns across every table.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchAllColumnsRequest {
    /// Substring to look for in column names (case-insensitive).
    #[serde(default, rename = "searchTerm")]
    pub search_term: Option<String>,
}

/// Request body for searching columns in one table.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct SearchColumnsRequest {
    /// Substring to look for in column names (case-insensitive).
    #[serde(default, rename = "searchTerm")]
    pub search_term: Option<String>,

    /// Table to search in; `null` and `""` count as missing.
    #[serde(default, rename = "tableName")]
    #[validate(
        required(message = "Table name is required"),
        length(min = 1, message = "Table name is required")
    )]
    pub table_name: Option<String>,
}

impl SearchColumnsRequest {
    /// Table name, empty when absent. Meaningful only after `validate()`.
    pub fn table(&self) -> &str {
        self.table_name.as_deref().unwrap_or_default()
    }
}

/// Request body for searching table names.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchTablesRequest {
    /// Substring to look for in table names (case-insensitive).
    #[serde(default, rename = "searchTerm")]
    pub search_term: Option<String>,
}

/// One column from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,

    /// Owning table; only set by the cross-table search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Catalog data type name, e.g. "integer".
    pub data_type: String,

    /// Whether the column accepts NULL.
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// Builds a descriptor from raw catalog text; `is_nullable` is "YES" or "NO".
    pub fn from_catalog(
        name: String,
        table: Option<String>,
        data_type: String,
        is_nullable: &str,
    ) -> Self {
        Self {
            name,
            table,
            data_type,
            nullable: is_nullable == "YES",
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ColumnsResponse {
    pub columns: Vec<ColumnDescriptor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TablesResponse {
    pub tables: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_term_matches_everything() {
        assert_eq!(search_pattern(None), "%");
        assert_eq!(search_pattern(Some("")), "%");
    }

    #[test]
    fn test_term_is_wrapped() {
        assert_eq!(search_pattern(Some("user")), "%user%");
        assert_eq!(search_pattern(Some("a_b")), "%a_b%");
    }

    #[test]
    fn test_missing_table_name_fails_validation() {
        let req: SearchColumnsRequest = serde_json::from_str(r#"{"searchTerm":"id"}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Table name is required"));
    }

    #[test]
    fn test_null_or_empty_table_name_fails_validation() {
        for body in [r#"{"tableName":null}"#, r#"{"tableName":""}"#] {
            let req: SearchColumnsRequest = serde_json::from_str(body).unwrap();
            let err = req.validate().unwrap_err();
            assert!(err.to_string().contains("Table name is required"), "{}", body);
        }
    }

    #[test]
    fn test_null_search_term_is_accepted() {
        let req: SearchTablesRequest = serde_json::from_str(r#"{"searchTerm":null}"#).unwrap();
        assert!(req.search_term.is_none());
    }

    #[test]
    fn test_table_is_omitted_for_single_table_search() {
        let column = ColumnDescriptor::from_catalog("id".into(), None, "integer".into(), "NO");
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "id", "data_type": "integer", "nullable": false })
        );
    }

    #[test]
    fn test_nullable_flag() {
        let column = ColumnDescriptor::from_catalog(
            "email".into(),
            Some("users".into()),
            "text".into(),
            "YES",
        );
        assert!(column.nullable);
        assert_eq!(serde_json::to_value(&column).unwrap()["table"], "users");
    }
}
