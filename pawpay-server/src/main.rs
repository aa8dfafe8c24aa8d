//! PawPay Server
//!
//! A self-hosted donation payment server for a pet-adoption platform.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, get_database_url};
use pawpay_core::checkout::SessionStore;
use pawpay_core::events::{EventSenders, failure_reported_channel};
use pawpay_core::framework::DatabaseProcessor;
use pawpay_core::gateway::{PaymentGateway, SimulatedGateway};
use pawpay_core::ledger::{Ledger, MemoryLedger};
use pawpay_core::processors::{FailureLogger, SessionSweeper};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// PawPay - self-hosted donation payment server
#[derive(Parser, Debug)]
#[command(name = "pawpay-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./pawpay-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,

    /// Keep all records in memory instead of Postgres (demo mode)
    #[arg(long, default_value = "false")]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting pawpay-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Convert to shared config with separate locks for each section
    let shared_config = loaded_config.into_shared();

    // Choose the persistence backend
    let (ledger, db_pool) = if args.in_memory {
        tracing::info!("Using the in-memory ledger, records will not survive a restart");
        (Arc::new(Ledger::Memory(MemoryLedger::new())), None)
    } else {
        // Get database URL from environment
        let database_url = get_database_url().map_err(|e| {
            tracing::error!("DATABASE_URL environment variable not set");
            e
        })?;

        // Create database connection pool
        tracing::info!("Connecting to database...");
        let db_pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&database_url)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to database: {}", e);
                e
            })?;
        tracing::info!("Database connection established");

        // Run migrations if requested
        if args.migrate {
            tracing::info!("Running database migrations...");
            sqlx::migrate!("../migrations")
                .run(&db_pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to run migrations: {}", e);
                    e
                })?;
            tracing::info!("Migrations completed successfully");
        }

        let ledger = Arc::new(Ledger::Postgres(DatabaseProcessor {
            pool: db_pool.clone(),
        }));
        (ledger, Some(db_pool))
    };

    // Event channels and the processor shutdown signal
    let (failure_tx, failure_rx) = failure_reported_channel();
    let event_senders = EventSenders::new(failure_tx);
    let (processor_shutdown_tx, processor_shutdown_rx) = tokio::sync::watch::channel(false);

    // Checkout sessions and the simulated gateway
    let sessions = SessionStore::new();
    let gateway: Arc<dyn PaymentGateway> =
        Arc::new(SimulatedGateway::new(shared_config.gateway.clone()));

    // Spawn background processors
    let failure_logger =
        FailureLogger::new(ledger.clone(), failure_rx, processor_shutdown_rx.clone());
    let failure_logger_handle = tokio::spawn(failure_logger.run());

    let session_sweeper = SessionSweeper::new(
        sessions.clone(),
        shared_config.gateway.clone(),
        processor_shutdown_rx,
    );
    let session_sweeper_handle = tokio::spawn(session_sweeper.run());

    // Create application state
    let state = AppState::new(ledger, sessions, gateway, shared_config, event_senders);

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Stop background processors and wait for them to drain
    if processor_shutdown_tx.send(true).is_err() {
        tracing::warn!("Processor shutdown channel already closed");
    }
    if let Err(e) = failure_logger_handle.await {
        tracing::error!(error = %e, "FailureLogger task failed");
    }
    if let Err(e) = session_sweeper_handle.await {
        tracing::error!(error = %e, "SessionSweeper task failed");
    }

    // Signal the config reload handler to stop
    shutdown_notify.notify_one();

    // Close database connections gracefully
    if let Some(db_pool) = db_pool {
        tracing::info!("Closing database connections...");
        db_pool.close().await;
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
