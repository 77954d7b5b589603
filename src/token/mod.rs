//! Two-tier ephemeral token system.
//!
//! A 24-hour session token is issued after password verification; a
//! 30-minute media token is derived from a live session token and
//! authorizes exactly the streaming endpoint. Media tokens are chained to
//! their parent session: revoking or expiring the session invalidates
//! every media token derived from it immediately.
//!
//! Expired entries are evicted lazily on `validate`; an hourly background
//! reaper additionally sweeps both stores.

mod clock;
mod error;
mod media;
mod reaper;
mod session;


pub use clock::{Clock, SystemClock};
pub use error::TokenError;
pub use media::{MediaTokenStore, MEDIA_TOKEN_TTL};
pub use reaper::{ExpiryReaper, SWEEP_INTERVAL};
pub use session::{SessionTokenStore, SESSION_TOKEN_TTL};

#[cfg(test)]
pub use clock::ManualClock;

use std::sync::Arc;

/// Facade owning both token stores and the expiry reaper.
///
/// The reaper is started on the first issuance of any token and stopped
/// by `shutdown` (or drop).
pub struct TokenService {
    sessions: Arc<SessionTokenStore>,
    media: Arc<MediaTokenStore>,
    reaper: ExpiryReaper,
}

impl TokenService {
    /// Create a service backed by the monotonic system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a service with an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let sessions = Arc::new(SessionTokenStore::new(clock.clone()));
        let media = Arc::new(MediaTokenStore::new(sessions.clone(), clock));
        Self {
            sessions,
            media,
            reaper: ExpiryReaper::new(SWEEP_INTERVAL),
        }
    }

    /// Issue a session token after a successful password check.
    pub fn issue_session(&self) -> String {
        let token = self.sessions.issue();
        self.ensure_reaper();
        token
    }

    /// Issue (or reuse) the media token for a live session.
    pub fn issue_media(&self, session_id: &str) -> Result<String, TokenError> {
        let token = self.media.issue(session_id)?;
        self.ensure_reaper();
        Ok(token)
    }

    /// Revoke a session and every media token derived from it.
    pub fn logout(&self, session_id: &str) {
        self.sessions.revoke(session_id);
        self.media.revoke_by_session(session_id);
    }

    pub fn sessions(&self) -> &SessionTokenStore {
        &self.sessions
    }

    pub fn media(&self) -> &MediaTokenStore {
        &self.media
    }

    /// Stop the background reaper.
    pub fn shutdown(&self) {
        self.reaper.shutdown();
    }

    fn ensure_reaper(&self) {
        self.reaper
            .ensure_started(self.sessions.clone(), self.media.clone());
    }

    #[cfg(test)]
    pub(crate) fn reaper_running(&self) -> bool {
        self.reaper.is_running()
    }
}

impl Default for TokenService {
    fn default() -> Self {
        Self::new()
    }
}
