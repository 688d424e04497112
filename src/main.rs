//! Pagehook server entry point.
//!
//! Wires configuration, logging, the session and row stores, and the
//! compiled-in plugins together, then serves pages over HTTP.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use pagehook_core::config::AppConfig;
use pagehook_core::error::AppError;
use pagehook_core::traits::RowStore;
use pagehook_plugin::PluginLoader;
use pagehook_server::{AppState, InMemorySessionStore, build_app};

#[tokio::main]
async fn main() {
    let env = std::env::var("PAGEHOOK_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Pagehook v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Row store ────────────────────────────────────────
    let rows: Arc<dyn RowStore> = if config.database.url.is_empty() {
        tracing::info!("No database configured, using the in-memory row store");
        Arc::new(pagehook_database::MemoryRowStore::new())
    } else {
        tracing::info!("Connecting to database...");
        let pool = pagehook_database::connect_pool(&config.database).await?;
        Arc::new(pagehook_database::PgRowStore::new(pool))
    };

    // ── Step 2: Session store ────────────────────────────────────
    let sessions = Arc::new(InMemorySessionStore::new(config.session.ttl_seconds));

    // ── Step 3: Plugin loader with compiled-in plugins ───────────
    let loader = PluginLoader::new(&config.plugins.directory, &config.site.root_url)
        .with_plugin(Arc::new(plugin_header_footer::HeaderFooterPlugin::new()))
        .with_plugin(Arc::new(plugin_basic_auth::BasicAuthPlugin::new()));
    tracing::info!(
        plugins_dir = %config.plugins.directory,
        builtins = loader.builtin_count(),
        "Plugin system initialized"
    );

    // ── Step 4: Build and start HTTP server ──────────────────────
    let addr = config.server.bind_addr();
    let state = AppState {
        config: Arc::new(config),
        sessions,
        rows,
        loader: Arc::new(loader),
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Pagehook server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Pagehook server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
