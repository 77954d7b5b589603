//! API handlers and request middleware.

use axum::body::Body;
use axum::extract::{Query, Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;
use crate::config::check_media_file;
use crate::stream;

/// Body of `POST /api/verify-password`.
#[derive(Debug, Deserialize)]
pub struct PasswordBody {
    pub password: Option<String>,
}

/// Query parameters for the streaming endpoint. The media token travels as
/// a query parameter because the browser media element cannot set headers.
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    pub token: Option<String>,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve and validate the session token, or fail with 401.
fn authorize_session(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    match bearer_token(headers) {
        Some(token) if state.tokens.sessions().validate(token) => Ok(token.to_string()),
        _ => Err(ApiError::Unauthorized),
    }
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.as_bytes()
            .iter()
            .zip(b.as_bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}

/// POST /api/verify-password — exchange the shared password for a session
/// token.
pub async fn verify_password(
    State(state): State<AppState>,
    body: Option<Json<PasswordBody>>,
) -> Result<Json<Value>, ApiError> {
    let password = body
        .and_then(|Json(body)| body.password)
        .filter(|password| !password.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Password required".to_string()))?;

    if !constant_time_eq(&password, &state.config.password) {
        tracing::warn!("password verification failed");
        return Err(ApiError::Unauthorized);
    }

    let token = state.tokens.issue_session();
    tracing::info!("session token issued");
    Ok(Json(json!({ "success": true, "token": token })))
}

/// GET /api/get-password — return the shared password to an authenticated
/// session (used by the share-link flow).
pub async fn get_password(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    authorize_session(&state, &headers)?;
    Ok(Json(json!({ "password": state.config.password })))
}

/// POST /api/logout — revoke the session and every media token derived
/// from it.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let session = authorize_session(&state, &headers)?;
    state.tokens.logout(&session);
    tracing::info!("session revoked");
    Ok(Json(json!({ "success": true })))
}

/// GET /api/video-token — return the live media token for this session,
/// minting one if needed. Fails 404 with details when the media file is
/// missing, so misconfiguration surfaces before the client ever hits the
/// streaming endpoint.
pub async fn video_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let session = authorize_session(&state, &headers)?;

    check_media_file(&state.config.video_path)
        .await
        .map_err(|details| ApiError::NotFound { details })?;

    // The store re-validates the session, closing the race with a logout
    // that lands between the check above and this call.
    let token = state
        .tokens
        .issue_media(&session)
        .map_err(|_| ApiError::Unauthorized)?;
    Ok(Json(json!({ "token": token })))
}

/// GET /api/video-stream?token= — stream the media file, honoring byte
/// ranges. Authorization happens before any filesystem access.
pub async fn video_stream(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    match params.token.as_deref() {
        Some(token) if state.tokens.media().validate(token) => {}
        _ => return Err(ApiError::Forbidden),
    }

    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    stream::stream_media(&state.config.video_path, range).await
}

/// GET /api/session — report whether the presented session token is live.
/// Never errors; a missing or invalid token just reads as unauthenticated.
pub async fn session_status(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let authenticated = bearer_token(&headers)
        .map(|token| state.tokens.sessions().validate(token))
        .unwrap_or(false);
    Json(json!({ "authenticated": authenticated }))
}

/// Per-request log line. Query strings carry media tokens, so only the
/// path is logged.
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::debug!(%method, %path, status = %response.status(), "request");
    response
}
