//! Error response body.
//!
//! Success payloads are returned bare (`{ columns: [...] }` and friends);
//! only failures share a wrapper.

use serde::Serialize;
use utoipa::ToSchema;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Short error category, e.g. "Query execution failed".
    pub error: String,

    /// Driver-reported detail (present for database failures).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Creates a body with only a category.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    /// Creates a body with a category and a detail message.
    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}
