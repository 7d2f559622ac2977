//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling with deadpool-postgres, and the
//! `NoteStore` implementation that runs parameterized statements against
//! the `notes` table.

use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use notes_core::{
    NewNote, Note, NoteId, NoteName, NotePatch, NoteStore, StorageError, StorageResult,
};
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

use crate::config::ConfigError;
use crate::constants::{DEFAULT_DB_POOL_SIZE, DEFAULT_DB_TIMEOUT_SECS};
use crate::error::{ApiError, ApiResult};
use crate::tls::{self, DbSslMode};

// ============================================================================
// SQL
// ============================================================================

const SELECT_RECENT: &str =
    "SELECT id, name, content, created_at FROM notes ORDER BY created_at DESC, id DESC LIMIT $1";

const INSERT_NOTE: &str =
    "INSERT INTO notes (name, content) VALUES ($1, $2) RETURNING id, name, content, created_at";

const UPDATE_NAME: &str =
    "UPDATE notes SET name = $1 WHERE id = $2 RETURNING id, name, content, created_at";

const UPDATE_CONTENT: &str =
    "UPDATE notes SET content = $1 WHERE id = $2 RETURNING id, name, content, created_at";

const UPDATE_BOTH: &str = "UPDATE notes SET name = $1, content = $2 WHERE id = $3 \
     RETURNING id, name, content, created_at";

const DELETE_NOTE: &str = "DELETE FROM notes WHERE id = $1";

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL connection string
    pub url: String,
    /// Maximum pool size
    pub max_size: usize,
    /// How long a request waits for a pooled connection
    pub timeout: Duration,
    /// Server certificate handling when TLS is negotiated
    pub ssl_mode: DbSslMode,
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: DEFAULT_DB_POOL_SIZE,
            timeout: Duration::from_secs(DEFAULT_DB_TIMEOUT_SECS),
            ssl_mode: DbSslMode::default(),
        }
    }

    /// Create a new database configuration from environment variables.
    ///
    /// - `DATABASE_URL` (required)
    /// - `NOTES_DB_POOL_SIZE` (default: 16)
    /// - `NOTES_DB_TIMEOUT` seconds (default: 30)
    /// - `NOTES_DB_SSL`: `disable`, `no-verify` or `verify` (default: no-verify)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingRequired {
                field: "DATABASE_URL",
            })?;

        let mut config = Self::new(url);
        if let Some(raw) = lookup("NOTES_DB_POOL_SIZE") {
            config.max_size = match raw.trim().parse::<usize>() {
                Ok(0) => return Err(invalid("NOTES_DB_POOL_SIZE", raw, "must be at least 1")),
                Ok(size) => size,
                Err(e) => return Err(invalid("NOTES_DB_POOL_SIZE", raw, e)),
            };
        }
        if let Some(raw) = lookup("NOTES_DB_TIMEOUT") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid("NOTES_DB_TIMEOUT", raw.clone(), e))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("NOTES_DB_SSL") {
            config.ssl_mode = DbSslMode::parse(&raw)?;
        }
        Ok(config)
    }

    /// Create a connection pool from this configuration.
    ///
    /// No connection is opened here; the first checkout connects.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.url = Some(self.url.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_config = PoolConfig::new(self.max_size);
        pool_config.timeouts.wait = Some(self.timeout);
        cfg.pool = Some(pool_config);

        let connector = tls::make_connector(self.ssl_mode)
            .map_err(|e| ApiError::database_error(format!("Failed to configure TLS: {}", e)))?;

        let pool = match connector {
            Some(tls) => cfg.create_pool(Some(Runtime::Tokio1), tls),
            None => cfg.create_pool(Some(Runtime::Tokio1), NoTls),
        };
        pool.map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))
    }
}

fn invalid(field: &'static str, value: String, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        value,
        reason: reason.to_string(),
    }
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Handle to the connection pool. Created once in `main`, cloned into
/// request state, closed on shutdown.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Close the pool. Outstanding connections are dropped when returned.
    pub fn close(&self) {
        self.pool.close();
    }

    /// Get a connection from the pool.
    pub async fn get_conn(&self) -> StorageResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| StorageError::Unavailable {
            reason: e.to_string(),
        })
    }
}

fn query_failed(operation: &'static str) -> impl FnOnce(tokio_postgres::Error) -> StorageError {
    move |err| StorageError::QueryFailed {
        operation,
        reason: err.to_string(),
    }
}

/// Map a `RETURNING id, name, content, created_at` row.
fn note_from_row(row: &Row) -> Result<Note, tokio_postgres::Error> {
    // Rows written before the name column had a default may still be NULL.
    let name: Option<String> = row.try_get("name")?;
    Ok(Note {
        id: NoteId::new(row.try_get("id")?),
        name: name.unwrap_or_else(|| NoteName::default().into()),
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl NoteStore for DbClient {
    async fn note_list_recent(&self, limit: i64) -> StorageResult<Vec<Note>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(SELECT_RECENT, &[&limit])
            .await
            .map_err(query_failed("note_list_recent"))?;

        rows.iter()
            .map(note_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_failed("note_list_recent"))
    }

    async fn note_create(&self, note: &NewNote) -> StorageResult<Note> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(INSERT_NOTE, &[&note.name.as_str(), &note.content.as_str()])
            .await
            .map_err(query_failed("note_create"))?;

        note_from_row(&row).map_err(query_failed("note_create"))
    }

    async fn note_update(&self, id: NoteId, patch: &NotePatch) -> StorageResult<Option<Note>> {
        let conn = self.get_conn().await?;
        let id = id.as_i32();

        let row = match patch {
            NotePatch::Name(name) => conn.query_opt(UPDATE_NAME, &[&name.as_str(), &id]).await,
            NotePatch::Content(content) => {
                conn.query_opt(UPDATE_CONTENT, &[&content.as_str(), &id])
                    .await
            }
            NotePatch::Both { name, content } => {
                conn.query_opt(UPDATE_BOTH, &[&name.as_str(), &content.as_str(), &id])
                    .await
            }
        }
        .map_err(query_failed("note_update"))?;

        row.as_ref()
            .map(note_from_row)
            .transpose()
            .map_err(query_failed("note_update"))
    }

    async fn note_delete(&self, id: NoteId) -> StorageResult<bool> {
        let conn = self.get_conn().await?;
        let affected = conn
            .execute(DELETE_NOTE, &[&id.as_i32()])
            .await
            .map_err(query_failed("note_delete"))?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_database_url_required() {
        let result = DbConfig::from_lookup(lookup_from(&[]));
        assert_eq!(
            result.err(),
            Some(ConfigError::MissingRequired {
                field: "DATABASE_URL"
            })
        );

        let result = DbConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_pool_settings_from_env() -> Result<(), ConfigError> {
        let config = DbConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://notes@localhost/notes"),
            ("NOTES_DB_POOL_SIZE", "4"),
            ("NOTES_DB_TIMEOUT", "5"),
        ]))?;
        assert_eq!(config.url, "postgres://notes@localhost/notes");
        assert_eq!(config.max_size, 4);
        assert_eq!(config.timeout, Duration::from_secs(5));
        Ok(())
    }

    #[test]
    fn test_pool_settings_default() -> Result<(), ConfigError> {
        let config = DbConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/notes",
        )]))?;
        assert_eq!(config.max_size, DEFAULT_DB_POOL_SIZE);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_DB_TIMEOUT_SECS));
        assert_eq!(config.ssl_mode, DbSslMode::NoVerify);
        Ok(())
    }

    #[test]
    fn test_pool_size_must_be_positive_integer() {
        for raw in ["0", "lots", "-3"] {
            let result = DbConfig::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/notes"),
                ("NOTES_DB_POOL_SIZE", raw),
            ]));
            assert!(
                matches!(
                    result,
                    Err(ConfigError::InvalidValue {
                        field: "NOTES_DB_POOL_SIZE",
                        ..
                    })
                ),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let result = DbConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/notes"),
            ("NOTES_DB_TIMEOUT", "soon"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "NOTES_DB_TIMEOUT",
                ..
            })
        ));
    }

    #[test]
    fn test_ssl_mode_from_env() -> Result<(), ConfigError> {
        let config = DbConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/notes"),
            ("NOTES_DB_SSL", "disable"),
        ]))?;
        assert_eq!(config.ssl_mode, DbSslMode::Disable);

        let result = DbConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/notes"),
            ("NOTES_DB_SSL", "maybe"),
        ]));
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_pool_is_lazy() -> ApiResult<()> {
        // Nothing listens here; creating the pool must still succeed.
        for ssl_mode in [DbSslMode::Disable, DbSslMode::NoVerify, DbSslMode::Verify] {
            let mut config = DbConfig::new("postgres://nobody@127.0.0.1:1/none");
            config.ssl_mode = ssl_mode;
            let db = DbClient::from_config(&config)?;
            assert_eq!(db.pool_size(), 0);
            db.close();
        }
        Ok(())
    }

    #[test]
    fn test_update_statements_return_full_row() {
        for sql in [UPDATE_NAME, UPDATE_CONTENT, UPDATE_BOTH, INSERT_NOTE] {
            assert!(sql.ends_with("RETURNING id, name, content, created_at"));
        }
    }
}
