//! Graceful shutdown
//!
//! OS signals (SIGTERM, SIGINT) and explicit requests both flip one watch
//! channel; the HTTP server drains connections once it fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

/// Shutdown coordinator shared between the signal listener and the server
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
    is_shutting_down: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
            is_shutting_down: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.is_shutting_down.load(Ordering::SeqCst)
    }

    /// Initiate shutdown; repeated calls are ignored
    pub fn shutdown(&self) {
        if self.is_shutting_down.swap(true, Ordering::SeqCst) {
            return;
        }

        info!("Initiating graceful shutdown...");
        let _ = self.shutdown_tx.send(true);
    }

    /// Block until the OS asks the process to stop, then start shutdown.
    ///
    /// A handler that cannot be registered is logged and skipped; the
    /// remaining signals still work.
    pub async fn wait_for_signal(&self) {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let terminate = async {
                match signal(SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        sigterm.recv().await;
                        info!("Received SIGTERM");
                    }
                    Err(e) => {
                        error!("Failed to register SIGTERM handler: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            };

            tokio::select! {
                _ = terminate => {}
                _ = ctrl_c() => {}
            }
        }

        #[cfg(not(unix))]
        ctrl_c().await;

        self.shutdown();
    }

    /// Future that resolves once shutdown has been requested, for
    /// `axum::serve(..).with_graceful_shutdown`
    pub fn signal(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.shutdown_rx.clone();

        async move {
            while !*rx.borrow() {
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C"),
        Err(e) => {
            error!("Failed to register Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signal_resolves_after_shutdown() {
        let coordinator = ShutdownCoordinator::new();
        let signal = coordinator.signal();

        assert!(!coordinator.is_shutting_down());
        coordinator.shutdown();
        assert!(coordinator.is_shutting_down());

        tokio::time::timeout(Duration::from_secs(1), signal)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let coordinator = ShutdownCoordinator::new();
        let clone = coordinator.clone();

        coordinator.shutdown();
        clone.shutdown();

        assert!(clone.is_shutting_down());
        tokio::time::timeout(Duration::from_secs(1), clone.signal())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_signal_pending_without_shutdown() {
        let coordinator = ShutdownCoordinator::new();
        let result = tokio::time::timeout(Duration::from_millis(50), coordinator.signal()).await;
        assert!(result.is_err());
    }
}
