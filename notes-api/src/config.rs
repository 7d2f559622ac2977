//! API Configuration Module
//!
//! Listener address, CORS, and startup-reconciliation policy. Values come
//! from environment variables with development-friendly defaults.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{DEFAULT_BIND_HOST, DEFAULT_CORS_MAX_AGE_SECS, DEFAULT_PORT};

// ============================================================================
// CONFIG ERRORS
// ============================================================================

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {field}")]
    MissingRequired { field: &'static str },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

// ============================================================================
// SCHEMA FAILURE POLICY
// ============================================================================

/// What to do when startup schema reconciliation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaFailurePolicy {
    /// Log the failure and keep booting. Requests will surface
    /// `database_error` if the table is really unusable.
    #[default]
    Continue,
    /// Refuse to start.
    Abort,
}

impl SchemaFailurePolicy {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "continue" | "warn" | "log" => Ok(Self::Continue),
            "abort" | "fatal" => Ok(Self::Abort),
            other => Err(ConfigError::InvalidValue {
                field: "NOTES_SCHEMA_ON_FAILURE",
                value: other.to_string(),
                reason: "expected 'continue' or 'abort'".to_string(),
            }),
        }
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// HTTP-side configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind.
    pub bind_host: String,

    /// Listen port.
    pub port: u16,

    /// Allowed CORS origins. Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache.
    pub cors_max_age: Duration,

    /// Startup reconciliation failure handling.
    pub schema_failure_policy: SchemaFailurePolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
            cors_max_age: Duration::from_secs(DEFAULT_CORS_MAX_AGE_SECS),
            schema_failure_policy: SchemaFailurePolicy::Continue,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: Listen port (default: 3000)
    /// - `NOTES_BIND`: Bind host (default: 0.0.0.0)
    /// - `NOTES_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `NOTES_SCHEMA_ON_FAILURE`: `continue` or `abort` (default: continue)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_host = lookup("NOTES_BIND")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.bind_host);

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                field: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let cors_origins = lookup("NOTES_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let schema_failure_policy = match lookup("NOTES_SCHEMA_ON_FAILURE") {
            Some(raw) => SchemaFailurePolicy::parse(&raw)?,
            None => defaults.schema_failure_policy,
        };

        Ok(Self {
            bind_host,
            port,
            cors_origins,
            cors_max_age: defaults.cors_max_age,
            schema_failure_policy,
        })
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "NOTES_BIND",
                value: addr,
                reason: e.to_string(),
            })
    }
}
