//! Cinder Backend - one-time encrypted message drop
//!
//! A privacy-first server that:
//! - Stores client-encrypted envelopes behind short random identifiers
//! - Destroys each message's ciphertext atomically on first read
//!
//! # Security Properties
//!
//! - No plaintext content ever touches the server
//! - No key material: the password lives in the URL fragment only
//! - After consumption the original ciphertext is unrecoverable, even by
//!   the server operator

use std::sync::Arc;

use axum::Router;
use cinder_backend::{build_router, AppState, Config, MemoryStore, MessageService};
use tracing::info;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize structured logging
    init_tracing();

    // Load configuration
    let config = Config::from_env();
    log_startup_info(&config);

    // Initialize core components
    let store = Arc::new(MemoryStore::new(&config));
    let service = MessageService::new(store);
    let state = AppState::new(service);

    // Build and serve the application
    let app = build_router(state);
    serve(app, &config).await;
}

/// Initialize tracing with environment-based log levels.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinder_backend=debug,tower_http=info")),
        )
        .init();
}

/// Log startup configuration (nothing sensitive exists to leak).
fn log_startup_info(config: &Config) {
    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        storage = "memory",
        max_records = config.max_records,
        "Starting Cinder backend"
    );
}

/// Bind to address and serve the application.
async fn serve(app: Router, config: &Config) {
    let bind_addr = format!("{}:{}", config.bind_addr, config.port);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    info!(addr = %bind_addr, "Server listening");

    axum::serve(listener, app).await.expect("Server error");
}
