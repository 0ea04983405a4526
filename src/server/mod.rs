//! HTTP surface and periodic trigger.
//!
//! Provides three endpoints:
//! - `/` - runs the pipeline and renders the dashboard
//! - `/api/vps` - runs the pipeline and returns the report as JSON
//! - `/health` - liveness check
//!
//! Alongside the server, a background task runs the pipeline on a fixed
//! interval until the shared cancellation token fires.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use log::{error, info};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::pipeline::{Pipeline, Trigger};
use crate::storage::KvStore;

use handlers::{api_handler, dashboard_handler, health_handler};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline<dyn KvStore>>,
}

/// Builds the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/api/vps", get(api_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Serves HTTP on `addr` until `cancel` fires.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    cancel: CancellationToken,
) -> Result<(), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind dashboard server to {}: {}", addr, e))?;

    info!("Dashboard listening on http://{}/", addr);
    info!("  - JSON: http://{}/api/vps", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| anyhow::anyhow!("Dashboard server error: {}", e))?;

    Ok(())
}

/// Spawns the periodic trigger. The first run happens immediately.
pub fn spawn_scheduler(
    pipeline: Arc<Pipeline<dyn KvStore>>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    match pipeline.run(Trigger::Scheduled).await {
                        Ok(report) => info!(
                            "Scheduled run finished: {} records, {} warnings",
                            report.records.len(),
                            report.warnings
                        ),
                        Err(e) => error!("Scheduled run failed: {} ({})", e, e.user_hint()),
                    }
                }
            }
        }
        info!("Scheduler stopped");
    })
}

/// Cancels `cancel` on Ctrl-C, then waits for `tasks` to finish.
pub async fn shutdown_on_ctrl_c(cancel: CancellationToken, tasks: Vec<JoinHandle<()>>) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Shutting down");
        }
    }
    cancel.cancel();
    for task in tasks {
        if let Err(e) = task.await {
            error!("Background task ended abnormally: {}", e);
        }
    }
}
