//! HTML-to-PDF Server
//!
//! Accepts HTML over HTTP, renders it to PDF and hands back a link that stays
//! valid for five minutes.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use html_pdf_server::config::Config;
use html_pdf_server::convert::Converter;
use html_pdf_server::render::{PdfRenderer, WkHtmlToPdf};
use html_pdf_server::routes;
use html_pdf_server::state::AppState;
use html_pdf_server::store::{ArtifactStore, ARTIFACT_TTL};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "html_pdf_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting HTML-to-PDF Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Storage directory: {}", config.storage.dir.display());

    let store = ArtifactStore::open(config.storage.dir.clone(), ARTIFACT_TTL)
        .await
        .context("failed to prepare storage directory")?;

    if let Err(e) = store.reclaim_stale().await {
        tracing::warn!("Startup sweep of storage directory failed: {}", e);
    }

    let renderer = Arc::new(WkHtmlToPdf::new(config.renderer.wkhtmltopdf()));
    if !renderer.is_available().await {
        tracing::warn!(
            "{} not found at '{}'; conversions will fail until it is installed",
            renderer.name(),
            config.renderer.wkhtmltopdf_path
        );
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid SERVER_HOST/SERVER_PORT")?;

    let app_state = AppState::new(config, Converter::new(store, renderer));
    let app = routes::router(app_state);

    tracing::info!("HTML-to-PDF Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
