// Main entry point for the mock KYC server

use kyc_mock_server::api::{create_router, AccountStore, AppState};
use kyc_mock_server::config::Config;
use kyc_mock_server::engine::MockResultBuilder;
use kyc_mock_server::infra::sqlite_store::SqliteAccountStore;
use kyc_mock_server::state::memory_store::InMemoryAccountStore;

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load and validate configuration first (before any logging)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Initialize tracing subscriber with config values
    init_tracing(&config)?;

    info!("Starting mock KYC server");
    info!(
        bind_address = %config.bind_address,
        port = config.port,
        base_url = %config.base_url,
        callback_delay_ms = config.callback_delay_ms,
        "Configuration loaded"
    );

    if config.client_id == kyc_mock_server::config::DEFAULT_CLIENT_ID {
        warn!("Using default mock client credentials");
    }

    // 3. Choose the record store
    let store: Arc<dyn AccountStore + Send + Sync> = match config.database_path {
        Some(ref path) => Arc::new(SqliteAccountStore::connect(path).await.map_err(|e| {
            error!(error = %e, path = ?path, "Failed to open SQLite store");
            e
        })?),
        None => {
            info!("DB_PATH not set, using in-memory store");
            Arc::new(InMemoryAccountStore::new())
        }
    };

    let addr = format!("{}:{}", config.bind_address, config.port);

    // 4. Wire shared state and router
    let app_state = AppState::new(config, store, MockResultBuilder::default())?;
    let router = create_router(app_state);

    // 5. Start HTTP server
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!(error = %e, addr = %addr, "Failed to bind to address");
        e
    })?;

    info!(addr = %addr, "Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!(error = %e, "Server error");
            e
        })?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber based on configuration
///
/// `RUST_LOG` takes precedence over `LOG_LEVEL`.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_env_filter(filter);

    let result = if config.log_format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => {
            info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            info!("SIGTERM received, starting graceful shutdown");
        },
    }
}
