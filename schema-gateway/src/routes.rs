//! 路由模块

use axum::{
    routing::{get, post},
    Router,
};
use crate::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/api/columns/search-all", post(handlers::search_all_columns))
        .route("/api/columns/search", post(handlers::search_columns))
        .route("/api/tables/search", post(handlers::search_tables))
        .route("/api/query/execute", post(handlers::execute_query))
        .route("/api/health", get(handlers::health_check))
}
