//! Schema 检索与查询执行服务模块

use std::sync::Arc;

use validator::Validate;

use common::errors::{AppError, AppResult};
use common::models::{
    search_pattern, ColumnDescriptor, ExecuteQueryRequest, QueryResult, SearchAllColumnsRequest,
    SearchColumnsRequest, SearchTablesRequest,
};
use common::utils::SqlValidator;

use crate::repository::CatalogRepository;

/// 请求校验、模式构造与错误归类
pub struct SchemaService {
    catalog: Arc<dyn CatalogRepository>,
}

impl SchemaService {
    /// 创建新的服务实例
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// 跨所有表检索列
    pub async fn search_all_columns(
        &self,
        req: SearchAllColumnsRequest,
    ) -> AppResult<Vec<ColumnDescriptor>> {
        let term = req.search_term.as_deref().unwrap_or_default();
        tracing::info!(search_term = %term, "searching columns across all tables");

        let columns = self
            .catalog
            .columns_in_schema(&search_pattern(req.search_term.as_deref()))
            .await?;

        tracing::info!(count = columns.len(), "columns found across all tables");
        Ok(columns)
    }

    /// 在指定表中检索列
    pub async fn search_columns(&self, req: SearchColumnsRequest) -> AppResult<Vec<ColumnDescriptor>> {
        let term = req.search_term.as_deref().unwrap_or_default();
        tracing::info!(table = %req.table(), search_term = %term, "searching columns");

        req.validate()?;

        let columns = self
            .catalog
            .columns_in_table(req.table(), &search_pattern(req.search_term.as_deref()))
            .await?;

        tracing::info!(table = %req.table(), count = columns.len(), "columns found");
        Ok(columns)
    }

    /// 检索表名
    pub async fn search_tables(&self, req: SearchTablesRequest) -> AppResult<Vec<String>> {
        let term = req.search_term.as_deref().unwrap_or_default();
        tracing::info!(search_term = %term, "searching tables");

        let tables = self
            .catalog
            .tables(&search_pattern(req.search_term.as_deref()))
            .await?;

        tracing::info!(count = tables.len(), "tables found");
        Ok(tables)
    }

    /// 执行只读查询
    ///
    /// 执行失败归为客户端错误（400）。
    pub async fn execute(&self, req: ExecuteQueryRequest) -> AppResult<QueryResult> {
        req.validate()?;
        SqlValidator::ensure_read_only(req.sql())?;

        let result = self
            .catalog
            .execute(req.sql())
            .await
            .map_err(AppError::into_query_execution)?;

        tracing::info!(rows = result.row_count, fields = result.fields.len(), "query executed");
        Ok(result)
    }
}
