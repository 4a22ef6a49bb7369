//! 目录访问接口
//!
//! Handlers only see this trait; the Postgres implementation lives in
//! `pg_repository`, tests plug in an in-memory double.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use common::errors::AppResult;
use common::models::{ColumnDescriptor, QueryResult};

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Columns of every table in the default schema whose name matches
    /// `pattern`, ordered by table then ordinal position. Descriptors carry
    /// their table name.
    async fn columns_in_schema(&self, pattern: &str) -> AppResult<Vec<ColumnDescriptor>>;

    /// Columns of `table` whose name matches `pattern`, in ordinal order.
    async fn columns_in_table(&self, table: &str, pattern: &str) -> AppResult<Vec<ColumnDescriptor>>;

    /// Base tables of the default schema matching `pattern`, alphabetical.
    async fn tables(&self, pattern: &str) -> AppResult<Vec<String>>;

    /// Runs `sql` verbatim, without parameters.
    async fn execute(&self, sql: &str) -> AppResult<QueryResult>;

    /// Liveness probe; returns the server clock.
    async fn server_time(&self) -> AppResult<DateTime<Utc>>;
}
