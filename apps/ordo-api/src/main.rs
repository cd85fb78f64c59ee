//! # Ordo API server binary
//!
//! ```text
//! load config ─► init logging ─► open pool ─► migrate (log on failure)
//!      ─► serve until Ctrl+C / SIGTERM ─► close pool
//! ```

use tokio::net::TcpListener;
use tracing::{error, info};

use ordo_api::config::ApiConfig;
use ordo_api::{logging, router, AppState};
use ordo_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::load()?;

    // Held until exit so buffered file output is flushed
    let _log_guard = logging::init(&config.log)?;

    info!(
        host = %config.http_host,
        port = config.http_port,
        database_url = %config.database_url,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config()).await?;

    // A failed migration leaves the server up; requests touching the
    // missing schema fail with 500 until it is fixed.
    if let Err(e) = db.run_migrations().await {
        error!(error = %e, "Database migration failed, continuing startup");
    }

    let app = router(AppState::new(db.clone()));

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
