//! Request and response shapes.

pub mod query;
pub mod schema;

// Re-export commonly used types
pub use query::{ExecuteQueryRequest, FieldDescriptor, QueryResult};
pub use schema::{
    search_pattern, ColumnDescriptor, ColumnsResponse, SearchAllColumnsRequest,
    SearchColumnsRequest, SearchTablesRequest, TablesResponse,
};
