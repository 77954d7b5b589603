//! solocast - password-gated streaming server for a single media file
//!
//! This crate provides the core functionality for solocast including:
//! - Two-tier ephemeral tokens: 24-hour session tokens chained to
//!   30-minute media tokens, with lazy eviction, an hourly background
//!   reaper, and cascading revocation on logout
//! - HTTP byte-range streaming with seek support and incremental I/O
//! - YAML deployment configuration with environment overrides

pub mod config;
pub mod server;
pub mod stream;
pub mod token;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError};
pub use server::{build_router, serve, ApiError, AppState};
pub use token::{TokenService, MEDIA_TOKEN_TTL, SESSION_TOKEN_TTL};
