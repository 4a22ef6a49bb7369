//! Handler模块

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use common::errors::AppError;
use common::extract::AppJson;
use common::models::{
    ColumnsResponse, ExecuteQueryRequest, QueryResult, SearchAllColumnsRequest,
    SearchColumnsRequest, SearchTablesRequest, TablesResponse,
};
use crate::service::SchemaService;
use crate::state::AppState;

/// 服务信息
#[utoipa::path(
    get,
    path = "/",
    tag = "gateway",
    responses(
        (status = 200, description = "服务信息与端点列表", body = ServiceInfo)
    )
)]
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "SQL Editor API Server".to_string(),
        status: "running".to_string(),
        endpoints: ServiceEndpoints {
            search_all_columns: "POST /api/columns/search-all".to_string(),
            search_columns: "POST /api/columns/search".to_string(),
            search_tables: "POST /api/tables/search".to_string(),
            execute_query: "POST /api/query/execute".to_string(),
        },
    })
}

/// 跨所有表检索列
#[utoipa::path(
    post,
    path = "/api/columns/search-all",
    tag = "schema",
    request_body = SearchAllColumnsRequest,
    responses(
        (status = 200, description = "匹配的列（含表名）", body = ColumnsResponse),
        (status = 500, description = "数据库错误", body = common::response::ErrorBody)
    )
)]
pub async fn search_all_columns(
    State(state): State<AppState>,
    AppJson(req): AppJson<SearchAllColumnsRequest>,
) -> Result<Json<ColumnsResponse>, AppError> {
    let service = SchemaService::new(state.catalog);
    let columns = service.search_all_columns(req).await?;
    Ok(Json(ColumnsResponse { columns }))
}

/// 在指定表中检索列
#[utoipa::path(
    post,
    path = "/api/columns/search",
    tag = "schema",
    request_body = SearchColumnsRequest,
    responses(
        (status = 200, description = "匹配的列", body = ColumnsResponse),
        (status = 400, description = "缺少表名", body = common::response::ErrorBody),
        (status = 500, description = "数据库错误", body = common::response::ErrorBody)
    )
)]
pub async fn search_columns(
    State(state): State<AppState>,
    AppJson(req): AppJson<SearchColumnsRequest>,
) -> Result<Json<ColumnsResponse>, AppError> {
    let service = SchemaService::new(state.catalog);
    let columns = service.search_columns(req).await?;
    Ok(Json(ColumnsResponse { columns }))
}

/// 检索表名
#[utoipa::path(
    post,
    path = "/api/tables/search",
    tag = "schema",
    request_body = SearchTablesRequest,
    responses(
        (status = 200, description = "匹配的表名", body = TablesResponse),
        (status = 500, description = "数据库错误", body = common::response::ErrorBody)
    )
)]
pub async fn search_tables(
    State(state): State<AppState>,
    AppJson(req): AppJson<SearchTablesRequest>,
) -> Result<Json<TablesResponse>, AppError> {
    let service = SchemaService::new(state.catalog);
    let tables = service.search_tables(req).await?;
    Ok(Json(TablesResponse { tables }))
}

/// 执行只读 SQL 查询
#[utoipa::path(
    post,
    path = "/api/query/execute",
    tag = "query",
    request_body = ExecuteQueryRequest,
    responses(
        (status = 200, description = "查询执行成功", body = QueryResult),
        (status = 400, description = "缺少查询或执行失败", body = common::response::ErrorBody),
        (status = 403, description = "非 SELECT 语句", body = common::response::ErrorBody)
    )
)]
pub async fn execute_query(
    State(state): State<AppState>,
    AppJson(req): AppJson<ExecuteQueryRequest>,
) -> Result<Json<QueryResult>, AppError> {
    let service = SchemaService::new(state.catalog);
    let result = service.execute(req).await?;
    Ok(Json(result))
}

/// 健康检查端点
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务运行正常", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

#[derive(Serialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    pub endpoints: ServiceEndpoints,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoints {
    pub search_all_columns: String,
    pub search_columns: String,
    pub search_tables: String,
    pub execute_query: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}
