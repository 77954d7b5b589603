//! Token store error types.

use thiserror::Error;

/// Errors surfaced by token issuance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The parent session token is missing, expired, or revoked.
    #[error("session token is not valid")]
    SessionInvalid,
}
