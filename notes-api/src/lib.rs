//! Notes API - HTTP Layer and PostgreSQL Storage
//!
//! Axum REST endpoints over a `notes` table. Request bodies are
//! normalized into `notes-core` types before reaching storage, and every
//! failure is rendered as `{"error": "<code>"}`.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod extractors;
mod macros;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod schema;
pub mod state;
pub mod telemetry;
pub mod tls;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::{ApiConfig, ConfigError, SchemaFailurePolicy};
pub use db::{DbClient, DbConfig};
pub use tls::DbSslMode;
pub use error::{ApiError, ApiResult, ErrorBody, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use schema::{reconcile, ReconcileReport};
pub use state::{AppState, SharedNoteStore};
pub use types::*;
