//! Schema 元数据检索与只读查询服务
//!
//! 提供以下功能：
//! - 按名称检索 public schema 中的表与列
//! - 执行以 SELECT 开头的 SQL 语句并返回 JSON 结果

mod handlers;
mod pg_repository;
mod repository;
mod routes;
mod service;
mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use common::config::AppConfig;
use common::middleware::request_id::request_id_middleware;
use pg_repository::PgCatalogRepository;
use repository::CatalogRepository;
use state::AppState;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

const SERVICE_NAME: &str = "schema-gateway";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Schema 网关 API",
        version = "0.1.0",
        description = "数据库元数据检索与只读 SQL 查询"
    ),
    paths(
        handlers::service_info,
        handlers::search_all_columns,
        handlers::search_columns,
        handlers::search_tables,
        handlers::execute_query,
        handlers::health_check,
    ),
    components(schemas(
        common::models::ColumnDescriptor,
        common::models::ColumnsResponse,
        common::models::TablesResponse,
        common::models::SearchAllColumnsRequest,
        common::models::SearchColumnsRequest,
        common::models::SearchTablesRequest,
        common::models::ExecuteQueryRequest,
        common::models::QueryResult,
        common::models::FieldDescriptor,
        common::response::ErrorBody,
        handlers::ServiceInfo,
        handlers::ServiceEndpoints,
        handlers::HealthResponse,
    )),
    tags(
        (name = "gateway", description = "服务信息"),
        (name = "schema", description = "表与列检索端点"),
        (name = "query", description = "查询执行端点"),
        (name = "health", description = "健康检查端点")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志追踪
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // 加载配置
    let config = AppConfig::load_with_service(SERVICE_NAME);

    // 连接池延迟建立，探活不阻塞启动
    let catalog = PgCatalogRepository::connect_lazy(&config.database)
        .context("invalid database configuration")?;
    let catalog: Arc<dyn CatalogRepository> = Arc::new(catalog);
    spawn_liveness_probe(catalog.clone());

    let state = AppState::new(config.clone(), catalog);
    let app = create_router(state);

    // 启动服务
    let addr = config.bind_address();
    info!(service = SERVICE_NAME, address = %addr, "启动服务");

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定地址失败: {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务启动失败")?;

    info!(service = SERVICE_NAME, "服务已停止");
    Ok(())
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Issues one `SELECT NOW()` in the background and logs the outcome. No retry.
fn spawn_liveness_probe(catalog: Arc<dyn CatalogRepository>) {
    tokio::spawn(async move {
        match catalog.server_time().await {
            Ok(now) => info!(server_time = %now, "数据库连接成功"),
            Err(e) => error!(error = %e, "数据库连接失败"),
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "无法监听关闭信号");
        std::future::pending::<()>().await;
    }
    info!("收到关闭信号");
}
