//! Social Hub - users, posts and follows over a token-protected REST API

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LoggingConfig, Overrides};
use social_api::{AppState, create_router};
use social_auth::JwtManager;
use social_db::Database;

/// Social Hub - social networking backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "SOCIAL_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "SOCIAL_PORT")]
    port: Option<u16>,

    /// Token signing secret
    #[arg(long, env = "JWT_SECRET_KEY", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// SQLite database file
    #[arg(long, env = "DB_PATH")]
    db_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?.with_overrides(Overrides {
        bind_address: args.bind,
        port: args.port,
        jwt_secret: args.jwt_secret,
        db_path: args.db_path,
    });
    config.validate()?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting Social Hub v{}", env!("CARGO_PKG_VERSION"));

    // Create the database directory
    if let Some(parent) = Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    // Initialize database
    let db = Database::new(&config.database.url()).await?;

    // Initialize JWT manager
    let jwt = Arc::new(JwtManager::new(&config.auth.jwt_secret)?);

    // Install the Prometheus recorder
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    // Create router
    let state = AppState::new(db, jwt);
    let app = create_router(state, Some(Arc::new(metrics_handle)))
        .layer(TraceLayer::new_for_http());

    // Determine bind address
    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .with_context(|| "Invalid bind address")?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
