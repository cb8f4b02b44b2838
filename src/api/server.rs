use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::info;

use super::{
    services::{download_files, health},
    state::AppState,
};
use crate::config::Config;
use crate::downloader::Downloader;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All routes, with gzip request bodies decompressed transparently
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/download", post(download_files))
        .route("/health", get(health))
        .with_state(state)
        .layer(RequestDecompressionLayer::new())
}

pub async fn run(config: Config) -> Result<(), AnyError> {
    let downloader = Downloader::from_config(&config.downloads)
        .map_err(|e| format!("Failed to initialize downloader: {}", e))?;

    info!(
        dir = %downloader.dir().root().display(),
        max_concurrency = downloader.max_concurrency(),
        "Download directory ready"
    );

    let listener = TcpListener::bind(config.server.bind_addr).await?;
    let address = listener.local_addr()?;
    let app = router(AppState::new(config, downloader));

    info!(%address, "fetchdrop server listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
