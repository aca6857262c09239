use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::open_catalog;

/// `hotswap serve`: run the HTTP API until Ctrl-C.
pub async fn serve(config_path: &Path, port: Option<u16>) -> Result<()> {
    let (config, store) = open_catalog(config_path)?;
    info!(path = %config.catalog.path.display(), "catalog opened");

    let host = config.host().to_string();
    let port = port.unwrap_or_else(|| config.port());
    let router = hotswap_api::build_router(store);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    info!(addr = %listener.local_addr()?, "API server listening");

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("hotswap server stopped");
    Ok(())
}
