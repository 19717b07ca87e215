//! HTTP request handlers for the Cinder backend API.
//!
//! All handlers follow the contract:
//! - Content is opaque envelope text; the server never sees plaintext
//! - Error bodies carry no internal detail; full detail goes to logs only
//! - Message content is never logged
//!
//! The decryption password rides the URL fragment
//! (`<origin>/<identifier>#<password>`), which conforming clients never
//! send to the server; nothing here ever handles it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::lifecycle::{LifecycleError, MessageService};
use crate::models::*;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MessageService>,
}

impl AppState {
    pub fn new(service: MessageService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// === Health Check ===

/// GET /health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// === Message Creation ===

/// POST /v1/messages - Store a client-encrypted message
///
/// The body carries only the serialized envelope text. The response carries
/// the allocated identifier the sender embeds in the share URL.
pub async fn create_message(
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<Json<CreateMessageResponse>, ApiError> {
    let record = state.service.create(&req.content)?;

    debug!(
        identifier = %record.identifier,
        content_len = req.content.len(),
        "Message stored"
    );

    Ok(Json(CreateMessageResponse {
        identifier: record.identifier,
    }))
}

// === Message Retrieval (consuming read) ===

/// GET /v1/messages/:identifier - Fetch a message, consuming it
///
/// The first successful fetch returns the envelope text with a null
/// `readAt`; the plaintext is destroyed server-side in the same atomic
/// step. Every later fetch returns the sentinel and the consumption time.
pub async fn fetch_message(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<FetchMessageResponse>, ApiError> {
    let outcome = state.service.fetch_and_consume(&identifier)?;

    Ok(Json(FetchMessageResponse {
        content: outcome.content,
        read_at: outcome.read_at,
    }))
}

// === Message Deletion ===

/// DELETE /v1/messages/:identifier - Remove a message outright
pub async fn delete_message(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<DeleteMessageResponse>, ApiError> {
    state.service.delete(&identifier)?;

    Ok(Json(DeleteMessageResponse { deleted: true }))
}

// === Error Handling ===

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Bad input shape; carries field-level messages
    Validation(ValidationErrors),
    /// Unknown identifier
    NotFound,
    /// Store refuses new records
    AtCapacity,
    /// Anything the caller has no business distinguishing
    Internal,
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Validation(errors) => ApiError::Validation(errors),
            LifecycleError::NotFound => ApiError::NotFound,
            LifecycleError::AtCapacity => {
                warn!("Record store at capacity, rejecting creation");
                ApiError::AtCapacity
            }
            LifecycleError::Allocation(err) => {
                // Operator attention needed; the caller just retries.
                error!(error = %err, "Identifier allocation failed");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorResponse { errors }),
            )
                .into_response(),
            other => {
                let (status, code, message) = match other {
                    ApiError::NotFound => (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        "no message with that identifier",
                    ),
                    ApiError::AtCapacity => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "AT_CAPACITY",
                        "server at capacity, try again later",
                    ),
                    ApiError::Internal => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "internal server error",
                    ),
                    ApiError::Validation(_) => unreachable!(),
                };

                let body = Json(ErrorResponse {
                    error: message.to_string(),
                    code,
                });

                (status, body).into_response()
            }
        }
    }
}
