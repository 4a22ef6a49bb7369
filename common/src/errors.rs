//! Application error type.
//!
//! Every handler returns `AppResult<T>`; the `IntoResponse` impl below is the
//! single place where an error becomes a status code and a JSON body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::ErrorBody;

/// Category reported for failures of the metadata routes.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";
/// Category reported when a client supplied statement fails to execute.
pub const QUERY_EXECUTION_FAILED: &str = "Query execution failed";

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// A required request field is missing or the body is malformed.
    #[error("{0}")]
    Validation(String),

    /// The statement did not pass the read-only gate.
    #[error("{0}")]
    UnsafeSql(String),

    /// The database rejected or failed a catalog query.
    #[error("database query failed: {0}")]
    DatabaseQuery(String),

    /// No usable connection to the database.
    #[error("database connection failed: {0}")]
    DatabaseConnection(String),

    /// A client supplied statement failed.
    #[error("query execution failed: {0}")]
    QueryExecution(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::QueryExecution(_) => StatusCode::BAD_REQUEST,
            AppError::UnsafeSql(_) => StatusCode::FORBIDDEN,
            AppError::DatabaseQuery(_) | AppError::DatabaseConnection(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Re-labels a database failure as a failure of the client's own statement.
    ///
    /// Used by the execute route, which answers 400 where the catalog routes
    /// answer 500.
    pub fn into_query_execution(self) -> Self {
        match self {
            AppError::DatabaseQuery(message) | AppError::DatabaseConnection(message) => {
                AppError::QueryExecution(message)
            }
            other => other,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            AppError::Validation(message) | AppError::UnsafeSql(message) => {
                ErrorBody::new(message.clone())
            }
            AppError::QueryExecution(message) => {
                ErrorBody::with_message(QUERY_EXECUTION_FAILED, message.clone())
            }
            AppError::DatabaseQuery(message)
            | AppError::DatabaseConnection(message)
            | AppError::Config(message) => {
                ErrorBody::with_message(INTERNAL_SERVER_ERROR, message.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            // Pass the server's own text through, without the driver prefix.
            sqlx::Error::Database(db) => AppError::DatabaseQuery(db.message().to_string()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => AppError::DatabaseConnection(err.to_string()),
            other => AppError::DatabaseQuery(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        AppError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_body_has_no_message() {
        let (status, body) = render(AppError::Validation("Table name is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Table name is required" }));
    }

    #[tokio::test]
    async fn test_unsafe_sql_is_forbidden() {
        let (status, body) =
            render(AppError::UnsafeSql("Only SELECT queries are allowed".into())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Only SELECT queries are allowed");
    }

    #[tokio::test]
    async fn test_database_query_is_internal_error() {
        let (status, body) = render(AppError::DatabaseQuery("boom".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "boom");
    }

    #[tokio::test]
    async fn test_query_execution_is_client_error() {
        let err = AppError::DatabaseQuery("relation \"missing\" does not exist".into())
            .into_query_execution();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], QUERY_EXECUTION_FAILED);
        assert_eq!(body["message"], "relation \"missing\" does not exist");
    }

    #[test]
    fn test_into_query_execution_keeps_other_variants() {
        let err = AppError::UnsafeSql("nope".into()).into_query_execution();
        assert!(matches!(err, AppError::UnsafeSql(_)));
    }

    #[test]
    fn test_pool_timeout_maps_to_connection_error() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::DatabaseConnection(_)));
    }
}
