//! HTTP error taxonomy.
//!
//! Every store or validation failure is converted to one of these at the
//! boundary; no internal error text crosses into a response body. The 401
//! and 403 bodies never distinguish an unknown token from an expired one,
//! so the API cannot be used to enumerate live tokens.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// API-boundary error. Each variant maps to exactly one HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request field is missing.
    #[error("{0}")]
    BadRequest(String),

    /// Session token missing, unknown, expired, or revoked.
    #[error("unauthorized")]
    Unauthorized,

    /// Media token missing, unknown, expired, or orphaned. Kept distinct
    /// from `Unauthorized` because it guards a different resource.
    #[error("invalid media token")]
    Forbidden,

    /// The configured media resource is absent or misconfigured. Occurs
    /// only post-authorization, so a human-readable diagnostic is allowed.
    #[error("video not available: {details}")]
    NotFound { details: String },

    /// Malformed or out-of-bounds `Range` header.
    #[error("range not satisfiable for resource of {size} bytes")]
    RangeNotSatisfiable { size: u64 },

    /// Unexpected I/O failure. Logged server-side, never echoed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => error_body(StatusCode::BAD_REQUEST, &message, None),
            ApiError::Unauthorized => error_body(StatusCode::UNAUTHORIZED, "Unauthorized", None),
            ApiError::Forbidden => error_body(StatusCode::FORBIDDEN, "Invalid token", None),
            ApiError::NotFound { details } => error_body(
                StatusCode::NOT_FOUND,
                "Video not available",
                Some(details),
            ),
            ApiError::RangeNotSatisfiable { size } => {
                let mut response = error_body(
                    StatusCode::RANGE_NOT_SATISFIABLE,
                    "Requested range not satisfiable",
                    None,
                );
                if let Ok(value) = HeaderValue::from_str(&format!("bytes */{size}")) {
                    response.headers_mut().insert(header::CONTENT_RANGE, value);
                }
                response
            }
            ApiError::Internal(reason) => {
                tracing::error!(%reason, "internal server error");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Server error", None)
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str, details: Option<String>) -> Response {
    let mut body = json!({ "success": false, "message": message });
    if let Some(details) = details {
        body["details"] = json!(details);
    }
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound { details: "gone".into() }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::RangeNotSatisfiable { size: 10 }.status(),
            StatusCode::RANGE_NOT_SATISFIABLE
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unsatisfiable_response_carries_content_range() {
        let response = ApiError::RangeNotSatisfiable { size: 1000 }.into_response();
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).unwrap(),
            "bytes */1000"
        );
    }

    #[test]
    fn test_internal_error_body_is_generic() {
        let response = ApiError::Internal("secret /etc/path".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body content is checked at the router level; here we only assert
        // the status does not leak through headers.
        assert!(response.headers().get(header::CONTENT_RANGE).is_none());
    }
}
