//! Schema Reconciliation Binary
//!
//! Runs the startup reconciliation once and exits. Unlike the server, any
//! failure is fatal.
//!
//! Usage:
//!   DATABASE_URL=postgres://... cargo run -p notes-api --bin notes-migrate

use notes_api::{
    reconcile,
    telemetry::{init_tracing, TelemetryConfig},
    ApiResult, DbClient, DbConfig,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing(&TelemetryConfig::from_env())?;

    let db = DbClient::from_config(&DbConfig::from_env()?)?;
    let result = reconcile(&db).await;
    db.close();

    let report = result?;
    tracing::info!(
        statements = report.statements_run,
        backfilled_rows = report.backfilled_rows,
        "Schema reconciled"
    );
    Ok(())
}
