//! Constants for the Notes API

// ============================================================================
// SERVER
// ============================================================================

/// Default listen port when `PORT` is unset
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind host
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default CORS max age in seconds (24 hours)
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86400;

// ============================================================================
// DATABASE
// ============================================================================

/// Default connection pool size
pub const DEFAULT_DB_POOL_SIZE: usize = 16;

/// Default wait for a pooled connection, in seconds
pub const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// LOGGING
// ============================================================================

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "notes_api=debug,tower_http=debug,info";
