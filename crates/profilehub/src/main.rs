//! ProfileHub - account registration, login and profile visibility service

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;
use profilehub_api::{AppState, create_router};
use profilehub_auth::{JwtManager, PasswordManager};
use profilehub_db::Database;

/// ProfileHub - user accounts with public/private profiles
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "PROFILEHUB_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Database connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Token signing secret
    #[arg(long, env = "PROFILEHUB_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Grant the admin flag to an existing account
    GrantAdmin {
        /// Email of the account
        email: String,
    },
    /// Remove the admin flag from an account
    RevokeAdmin {
        /// Email of the account
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let file_config = Config::load(&args.config)?;
    let config_found = file_config.is_some();
    let mut config = file_config.unwrap_or_default();
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = secret;
    }
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Initialize logging
    init_logging(&config.logging.level, &config.logging.format);
    if config_found {
        info!("Loaded configuration from {}", args.config);
    } else {
        info!("Config file not found at {}, using defaults", args.config);
    }

    // Initialize database
    if let Some(dir) = sqlite_parent_dir(&config.database.url) {
        tokio::fs::create_dir_all(&dir).await?;
    }
    let db = Database::new(&config.database.url).await?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, db).await,
        Command::GrantAdmin { email } => set_admin(&db, &email, true).await,
        Command::RevokeAdmin { email } => set_admin(&db, &email, false).await,
    }
}

/// Out-of-band admin provisioning
async fn set_admin(db: &Database, email: &str, is_admin: bool) -> Result<()> {
    if !db.set_admin(email, is_admin).await? {
        bail!("No account registered with email {}", email);
    }
    info!("Set admin flag for {} to {}", email, is_admin);
    Ok(())
}

async fn serve(config: Config, db: Database) -> Result<()> {
    info!("Starting ProfileHub v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.uses_default_secret() {
        warn!("Using the default JWT secret; set auth.jwt_secret or PROFILEHUB_JWT_SECRET");
    }

    // Initialize metrics recorder
    let metrics_handle = Arc::new(PrometheusBuilder::new().install_recorder()?);

    // Initialize auth components
    let jwt = Arc::new(JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.token_expiry_hours,
    ));
    let passwords = Arc::new(PasswordManager::new(config.auth.password_hashing)?);

    // Create application state
    let state = AppState::new(db, jwt, passwords)?;

    // Create router
    let static_dir = config.server.static_dir.as_deref().map(Path::new);
    let app = create_router(state, Some(metrics_handle), static_dir)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr =
        format!("{}:{}", config.server.bind_address, config.server.port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Directory that must exist before SQLite can create the database file
fn sqlite_parent_dir(url: &str) -> Option<PathBuf> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Initialize logging
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
