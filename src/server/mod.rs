//! HTTP surface.
//!
//! Exposes the six `/api/*` endpoints: password verification, password
//! retrieval, logout, media-token issuance, the byte-range stream, and the
//! session probe. Session tokens travel as `Authorization: Bearer` headers;
//! media tokens as a `token` query parameter on the stream route.

mod error;
mod routes;


pub use error::ApiError;
pub use routes::{
    get_password, log_requests, logout, session_status, verify_password, video_stream,
    video_token,
};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::token::TokenService;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Create state with a fresh token service on the system clock.
    pub fn new(config: AppConfig) -> Self {
        Self::with_tokens(config, Arc::new(TokenService::new()))
    }

    /// Create state around an existing token service (used by tests to
    /// inject a manual clock).
    pub fn with_tokens(config: AppConfig, tokens: Arc<TokenService>) -> Self {
        Self {
            config: Arc::new(config),
            tokens,
        }
    }
}

/// Build the router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/api/verify-password", post(verify_password))
        .route("/api/get-password", get(get_password))
        .route("/api/logout", post(logout))
        .route("/api/video-token", get(video_token))
        .route("/api/video-stream", get(video_stream))
        .route("/api/session", get(session_status))
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), ApiError> {
    let router = build_router(state);

    tracing::info!("solocast listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::Internal(format!("bind failed: {e}")))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(())
}
