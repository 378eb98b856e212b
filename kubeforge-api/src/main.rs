use anyhow::Context;
use kubeforge_api::{config::KubeforgeConfig, logging, router, shutdown, AppState, Database};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--print-config") {
        print!("{}", KubeforgeConfig::generate_sample());
        return Ok(());
    }

    // Load configuration
    let config = KubeforgeConfig::load()?;
    config.validate()?;

    // The guard flushes the log file on drop
    let _log_guard = logging::init(&config.logging)?;
    info!("Configuration loaded successfully");

    // Initialize database
    let database = Database::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to open project database")?;
    database.migrate().await.context("Failed to run migrations")?;

    let addr = config.bind_address();
    let state = Arc::new(AppState::new(database, config));
    let app = router(state.clone());

    // Set up graceful shutdown
    let coordinator = shutdown::ShutdownCoordinator::new();
    let signal_listener = coordinator.clone();
    tokio::spawn(async move { signal_listener.wait_for_signal().await });

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("kubeforge API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(coordinator.signal())
        .await?;

    info!("Server stopped, running cleanup...");
    state.database.close().await;
    info!("Cleanup complete, exiting");

    Ok(())
}
