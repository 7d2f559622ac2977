//! Notes API Server Entry Point
//!
//! Initializes logging, reconciles the schema, and serves the Axum router
//! until Ctrl-C or SIGTERM.

use axum::Router;
use notes_api::{
    create_api_router,
    schema::apply_failure_policy,
    telemetry::{init_tracing, TelemetryConfig},
    ApiConfig, ApiError, ApiResult, AppState, DbClient, DbConfig,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing(&TelemetryConfig::from_env())?;

    let api_config = ApiConfig::from_env()?;
    let db_config = DbConfig::from_env()?;
    let db = DbClient::from_config(&db_config)?;

    apply_failure_policy(
        notes_api::reconcile(&db).await,
        api_config.schema_failure_policy,
    )?;
    tracing::info!(
        max_size = db_config.max_size,
        open_connections = db.pool_size(),
        ssl_mode = ?db_config.ssl_mode,
        "Database pool ready"
    );

    let app: Router = create_api_router(AppState::from_db(db.clone()), &api_config);

    let addr = api_config.bind_addr()?;
    tracing::info!(%addr, "Starting notes API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    db.close();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
