//! Startup schema reconciliation.
//!
//! Brings the `notes` table to its expected shape regardless of what was
//! there before. Every statement is conditional or idempotent, so this can
//! run on every boot and on several instances at once.

use notes_core::{StorageError, StorageResult};

use crate::config::SchemaFailurePolicy;
use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};

/// One reconciliation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatement {
    pub label: &'static str,
    pub sql: &'static str,
}

/// Label of the backfill step, whose row count is reported.
pub const BACKFILL_LABEL: &str = "backfill_name";

/// Reconciliation statements, in execution order.
pub const SCHEMA_STATEMENTS: [SchemaStatement; 4] = [
    SchemaStatement {
        label: "create_table",
        sql: "CREATE TABLE IF NOT EXISTS notes (\
              id SERIAL PRIMARY KEY, \
              content TEXT NOT NULL, \
              created_at TIMESTAMP NOT NULL DEFAULT NOW(), \
              name TEXT DEFAULT 'Anonym')",
    },
    SchemaStatement {
        label: "add_name_column",
        sql: "ALTER TABLE notes ADD COLUMN IF NOT EXISTS name TEXT",
    },
    SchemaStatement {
        label: BACKFILL_LABEL,
        sql: "UPDATE notes SET name = 'Anonym' WHERE name IS NULL OR name = ''",
    },
    SchemaStatement {
        label: "name_default",
        sql: "ALTER TABLE notes ALTER COLUMN name SET DEFAULT 'Anonym'",
    },
];

/// Outcome of a successful reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub statements_run: usize,
    /// Rows whose missing or empty name was set to the default.
    pub backfilled_rows: u64,
}

/// Run every reconciliation statement in order, stopping at the first failure.
///
/// Statements are not wrapped in a transaction; each one is safe on its own.
pub async fn reconcile(db: &DbClient) -> StorageResult<ReconcileReport> {
    let conn = db.get_conn().await?;
    let mut report = ReconcileReport::default();

    for statement in SCHEMA_STATEMENTS {
        let affected = conn
            .execute(statement.sql, &[])
            .await
            .map_err(|e| StorageError::SchemaFailed {
                statement: statement.label,
                reason: e.to_string(),
            })?;

        tracing::debug!(statement = statement.label, affected, "Schema statement applied");
        if statement.label == BACKFILL_LABEL {
            report.backfilled_rows = affected;
        }
        report.statements_run += 1;
    }

    Ok(report)
}

/// Log the reconciliation outcome and decide whether boot may continue.
pub fn apply_failure_policy(
    outcome: StorageResult<ReconcileReport>,
    policy: SchemaFailurePolicy,
) -> ApiResult<Option<ReconcileReport>> {
    match outcome {
        Ok(report) => {
            tracing::info!(
                statements = report.statements_run,
                backfilled_rows = report.backfilled_rows,
                "Schema reconciled"
            );
            Ok(Some(report))
        }
        Err(err) => match policy {
            SchemaFailurePolicy::Continue => {
                tracing::error!(error = %err, "Schema reconciliation failed, continuing startup");
                Ok(None)
            }
            SchemaFailurePolicy::Abort => {
                tracing::error!(error = %err, "Schema reconciliation failed, aborting startup");
                Err(ApiError::from(err))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_statement_order() {
        let labels: Vec<_> = SCHEMA_STATEMENTS.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec!["create_table", "add_name_column", BACKFILL_LABEL, "name_default"]
        );
    }

    #[test]
    fn test_statements_are_conditional() {
        assert!(SCHEMA_STATEMENTS[0].sql.contains("IF NOT EXISTS"));
        assert!(SCHEMA_STATEMENTS[1].sql.contains("IF NOT EXISTS"));
        assert!(SCHEMA_STATEMENTS[2].sql.contains("WHERE name IS NULL OR name = ''"));
        assert!(SCHEMA_STATEMENTS[0].sql.contains("name TEXT DEFAULT 'Anonym'"));
    }

    #[test]
    fn test_policy_continue_swallows_failure() {
        let failed = Err(StorageError::SchemaFailed {
            statement: "create_table",
            reason: "permission denied".to_string(),
        });
        let result = apply_failure_policy(failed, SchemaFailurePolicy::Continue);
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_policy_abort_propagates_failure() {
        let failed = Err(StorageError::Unavailable {
            reason: "connection refused".to_string(),
        });
        let result = apply_failure_policy(failed, SchemaFailurePolicy::Abort);
        assert_eq!(result.map_err(|e| e.code), Err(ErrorCode::DatabaseError));
    }

    #[test]
    fn test_policy_passes_report_through() {
        let report = ReconcileReport {
            statements_run: 4,
            backfilled_rows: 2,
        };
        let result = apply_failure_policy(Ok(report), SchemaFailurePolicy::Abort);
        assert_eq!(result, Ok(Some(report)));
    }
}
