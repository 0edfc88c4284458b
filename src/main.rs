//! Library System - command shell and web view over one lending store

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use librarysystem::{
    api,
    cli,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    AppState, Library,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    let _log_guard = init_tracing(&config.logging)?;

    tracing::info!("Starting Library System v{}", env!("CARGO_PKG_VERSION"));

    // Open (and on first run create and seed) the store
    let repository = Repository::open(&config.database)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.path))?;

    tracing::info!("Opened database {}", config.database.path);

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState::new(config, repository.clone());
    let app = api::create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on http://{}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("HTTP server stopped: {}", e);
        }
    });

    let library: Arc<dyn Library> = Arc::new(state.services.lending.clone());
    cli::run(library).await?;

    repository.close().await;
    Ok(())
}

/// Set up logging to stderr, or to a file when one is configured
fn init_tracing(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("librarysystem={},tower_http=info", config.level).into());

    let (writer, guard) = match &config.file {
        Some(file) => {
            let appender = tracing_appender::rolling::never(".", file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (tracing_subscriber::fmt::writer::BoxMakeWriter::new(writer), Some(guard))
        }
        None => (
            tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr),
            None,
        ),
    };

    let layer = match config.format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().with_writer(writer).boxed(),
        _ => tracing_subscriber::fmt::layer().with_writer(writer).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
