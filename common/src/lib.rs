//! Shared building blocks for the schema gateway services.
//!
//! - `config`: environment driven configuration
//! - `errors`: the application error type and its HTTP mapping
//! - `extract`: JSON body extractor with mapped rejections
//! - `middleware`: request-id tagging
//! - `models`: request and response shapes
//! - `response`: error response body
//! - `utils`: SQL statement gate

pub mod config;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod response;
pub mod utils;
