//! SQL query models.
//!
//! Contains models for free-form query execution.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for executing a SQL query.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ExecuteQueryRequest {
    /// SQL text; executed verbatim once it passes the SELECT gate.
    /// `null` and `""` count as missing.
    #[serde(default)]
    #[validate(
        required(message = "Query is required"),
        length(min = 1, message = "Query is required")
    )]
    pub query: Option<String>,
}

impl ExecuteQueryRequest {
    /// Statement text, empty when absent. Meaningful only after `validate()`.
    pub fn sql(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }
}

/// Result of a SQL query execution.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct QueryResult {
    /// One JSON object per row, keyed by column name in column order.
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,

    /// Number of rows returned.
    #[serde(rename = "rowCount")]
    pub row_count: usize,

    /// Column descriptors in result order.
    pub fields: Vec<FieldDescriptor>,
}

/// Column descriptor in a query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldDescriptor {
    /// Column name.
    pub name: String,

    /// Postgres type oid.
    #[serde(rename = "dataType")]
    pub data_type: u32,
}

impl QueryResult {
    pub fn new(
        rows: Vec<serde_json::Map<String, serde_json::Value>>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            row_count: rows.len(),
            rows,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_query_fails_validation() {
        for body in ["{}", r#"{"query":null}"#, r#"{"query":""}"#] {
            let req: ExecuteQueryRequest = serde_json::from_str(body).unwrap();
            let err = req.validate().unwrap_err();
            assert!(err.to_string().contains("Query is required"), "{}", body);
        }
    }

    #[test]
    fn test_result_wire_names() {
        let mut row = serde_json::Map::new();
        row.insert("x".into(), serde_json::json!(1));
        let result = QueryResult::new(
            vec![row],
            vec![FieldDescriptor { name: "x".into(), data_type: 23 }],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rows": [{ "x": 1 }],
                "rowCount": 1,
                "fields": [{ "name": "x", "dataType": 23 }]
            })
        );
    }
}
