//! # Cinder Backend
//!
//! Stores client-encrypted one-time messages and destroys them on first read.
//!
//! ## Design Principles
//!
//! - **No plaintext content**: senders encrypt before submitting; the server
//!   stores opaque envelope text
//! - **No key material**: the password travels in the URL fragment, which
//!   never reaches the server
//! - **Read once**: the first fetch atomically replaces the content with a
//!   sentinel; afterwards the original ciphertext is gone, even for the
//!   server operator
//! - **Minimal logging**: identifiers only, never content
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │   Sender    │─────▶│   Backend   │◀─────│  Recipient  │
//! │ (encrypts)  │      └─────────────┘      │ (decrypts)  │
//! └─────────────┘             │             └─────────────┘
//!        │              In-Memory Store            ▲
//!        └──────── URL fragment carries ───────────┘
//!                     the password
//! ```
//!
//! ## API Overview
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/health` | GET | Health check |
//! | `/v1/messages` | POST | Store an encrypted message |
//! | `/v1/messages/:identifier` | GET | Consuming read |
//! | `/v1/messages/:identifier` | DELETE | Remove a message |

pub mod config;
pub mod handlers;
pub mod identifier;
pub mod lifecycle;
pub mod models;
pub mod store;

pub use config::Config;
pub use handlers::AppState;
pub use lifecycle::MessageService;
pub use store::MemoryStore;

use axum::{
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Maximum request body size (64 KiB; an envelope for 10k characters of
/// plaintext stays well below this).
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Build the Axum router with all endpoints and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // API v1 endpoints
        .route("/v1/messages", post(handlers::create_message))
        .route("/v1/messages/:identifier", get(handlers::fetch_message))
        .route(
            "/v1/messages/:identifier",
            delete(handlers::delete_message),
        )
        // Middleware stack (order matters: first added = outermost)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
