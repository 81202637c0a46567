//! Main entry point for the admission prediction backend.
//!
//! This file loads configuration, initializes logging, loads the fitted scaler
//! and model from the registry (a missing or broken artifact stops the boot),
//! and serves the Axum router until Ctrl-C or SIGTERM.

use admit_adapters::FsArtifactStore;
use admit_backend::config::AppConfig;
use admit_backend::{app, logging, AppState};
use anyhow::Context;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("admit_backend=info,admit_adapters=info,tower=warn");

    let config = AppConfig::from_env()?;
    if config.auth.uses_dev_secret() {
        tracing::warn!("ADMIT_JWT_SECRET is not set; signing tokens with the development secret");
    }

    let store = FsArtifactStore::new(&config.artifacts.registry_dir);
    let state = AppState::load(&config, &store).await.with_context(|| {
        format!(
            "failed to load artifacts from {}",
            config.artifacts.registry_dir.display()
        )
    })?;

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to listen for SIGTERM: {}", err);
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
    tracing::info!("shutdown signal received");
}
