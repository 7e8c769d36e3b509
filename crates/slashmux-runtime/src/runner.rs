//! Process lifecycle: serve the router, wait, shut down cleanly.

use std::future::Future;

use tokio::signal;
use tracing::{error, info, warn};

use crate::error::RuntimeResult;
use slashmux_framework::Mux;

/// Serves `mux` until Ctrl+C or SIGTERM, then closes the session.
pub async fn run_until_shutdown(mux: Mux) -> RuntimeResult<()> {
    info!("Press Ctrl+C to stop.");
    run_until(mux, wait_for_shutdown()).await
}

/// Serves `mux` until `shutdown` completes, then closes the session.
pub async fn run_until<F>(mux: Mux, shutdown: F) -> RuntimeResult<()>
where
    F: Future<Output = ()>,
{
    let serving = mux.serve().await?;
    info!(
        commands = serving.commands().len(),
        scope = %serving.scope(),
        "Bot is now running"
    );

    shutdown.await;

    serving.close().await?;
    info!("Bot stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or on SIGTERM on unix.
pub async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => info!("Received Ctrl+C, shutting down"),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
                return;
            }
            Err(e) => warn!("Failed to register SIGTERM handler: {e}"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => error!("Failed to listen for Ctrl+C: {e}"),
    }
}
