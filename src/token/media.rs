//! Media token store.
//!
//! A media token is a short-lived credential scoped to the streaming
//! endpoint, derived from a session token. It carries the parent session's
//! id as a lookup key (never a pointer into the session store), so a media
//! token is live only while its parent session is: chained validity with a
//! single source of truth for revocation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::clock::Clock;
use super::error::TokenError;
use super::session::{generate_token, SessionTokenStore};

/// Fixed media token lifetime (non-renewing).
pub const MEDIA_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

struct MediaEntry {
    expires_at: Instant,
    session_id: String,
}

/// In-memory store of live media tokens.
///
/// Lock ordering: methods that need both stores take the media lock first
/// and the session lock (inside `SessionTokenStore::validate`) second.
/// `issue` validates the session before taking the media lock, so no path
/// acquires the locks in the opposite order.
pub struct MediaTokenStore {
    entries: Mutex<HashMap<String, MediaEntry>>,
    sessions: Arc<SessionTokenStore>,
    clock: Arc<dyn Clock>,
}

impl MediaTokenStore {
    pub fn new(sessions: Arc<SessionTokenStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            sessions,
            clock,
        }
    }

    /// Return the live media token for `session_id`, minting one if none
    /// exists. Issuance is idempotent with respect to an existing unexpired
    /// token, which prevents token churn on repeated access requests.
    ///
    /// The session is re-validated here regardless of what the caller
    /// checked, so a revoked session can never mint a media token.
    pub fn issue(&self, session_id: &str) -> Result<String, TokenError> {
        if !self.sessions.validate(session_id) {
            return Err(TokenError::SessionInvalid);
        }

        let now = self.clock.now();
        // The reuse scan and the insertion share one critical section;
        // concurrent requests for the same session see exactly one token.
        let mut entries = self.entries.lock();
        if let Some((token, _)) = entries
            .iter()
            .find(|(_, entry)| entry.session_id == session_id && now <= entry.expires_at)
        {
            return Ok(token.clone());
        }

        let token = generate_token();
        entries.insert(
            token.clone(),
            MediaEntry {
                expires_at: now + MEDIA_TOKEN_TTL,
                session_id: session_id.to_string(),
            },
        );
        Ok(token)
    }

    /// Check whether `token` is live. False if the token is absent or
    /// expired, or if the parent session no longer validates; in every
    /// failing case the entry is deleted on the spot.
    pub fn validate(&self, token: &str) -> bool {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get(token) else {
            return false;
        };
        if self.clock.now() > entry.expires_at {
            entries.remove(token);
            return false;
        }
        // Chained validity is never cached past the parent's lifetime.
        if !self.sessions.validate(&entry.session_id) {
            entries.remove(token);
            return false;
        }
        true
    }

    /// Delete every media token derived from `session_id`. Invoked by the
    /// logout flow so revoked sessions leave no orphaned media tokens
    /// inside the 30-minute window.
    pub fn revoke_by_session(&self, session_id: &str) {
        self.entries
            .lock()
            .retain(|_, entry| entry.session_id != session_id);
    }

    /// Remove every expired entry, returning how many were evicted.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.expires_at);
        before - entries.len()
    }

    /// Number of live-or-expired entries currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::clock::ManualClock;
    use crate::token::session::SESSION_TOKEN_TTL;

    fn stores() -> (MediaTokenStore, Arc<SessionTokenStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let sessions = Arc::new(SessionTokenStore::new(clock.clone()));
        let media = MediaTokenStore::new(sessions.clone(), clock.clone());
        (media, sessions, clock)
    }

    #[test]
    fn test_issue_requires_live_session() {
        let (media, _sessions, _clock) = stores();
        assert_eq!(
            media.issue("no-such-session"),
            Err(TokenError::SessionInvalid)
        );
        assert!(media.is_empty());
    }

    #[test]
    fn test_issue_is_idempotent_for_live_token() {
        let (media, sessions, _clock) = stores();
        let session = sessions.issue();

        let first = media.issue(&session).unwrap();
        let second = media.issue(&session).unwrap();
        assert_eq!(first, second);
        assert_eq!(media.len(), 1);
    }

    #[test]
    fn test_expired_token_is_replaced_on_issue() {
        let (media, sessions, clock) = stores();
        let session = sessions.issue();

        let first = media.issue(&session).unwrap();
        clock.advance(MEDIA_TOKEN_TTL + Duration::from_secs(1));
        let second = media.issue(&session).unwrap();
        assert_ne!(first, second);
        assert!(!media.validate(&first));
        assert!(media.validate(&second));
    }

    #[test]
    fn test_validate_expires_after_ttl() {
        let (media, sessions, clock) = stores();
        let session = sessions.issue();
        let token = media.issue(&session).unwrap();

        clock.advance(MEDIA_TOKEN_TTL - Duration::from_secs(1));
        assert!(media.validate(&token));

        clock.advance(Duration::from_secs(2));
        assert!(!media.validate(&token));
        assert!(media.is_empty());
    }

    #[test]
    fn test_session_revocation_cascades() {
        let (media, sessions, _clock) = stores();
        let session = sessions.issue();
        let token = media.issue(&session).unwrap();
        assert!(media.validate(&token));

        sessions.revoke(&session);
        // Well before the media token's own expiry, the chain is broken.
        assert!(!media.validate(&token));
        assert!(media.is_empty());
    }

    #[test]
    fn test_session_expiry_cascades() {
        let (media, sessions, clock) = stores();
        let session = sessions.issue();
        // Re-issue the media token late in the session's life so the media
        // token is still within its own 30 minutes when the session dies.
        clock.advance(SESSION_TOKEN_TTL - Duration::from_secs(60));
        let token = media.issue(&session).unwrap();
        assert!(media.validate(&token));

        clock.advance(Duration::from_secs(120));
        assert!(!media.validate(&token));
    }

    #[test]
    fn test_revoke_by_session_removes_only_matching() {
        let (media, sessions, _clock) = stores();
        let session_a = sessions.issue();
        let session_b = sessions.issue();
        let token_a = media.issue(&session_a).unwrap();
        let token_b = media.issue(&session_b).unwrap();

        media.revoke_by_session(&session_a);
        assert!(!media.validate(&token_a));
        assert!(media.validate(&token_b));
    }

    #[test]
    fn test_sweep_removes_expired_entries() {
        let (media, sessions, clock) = stores();
        let session = sessions.issue();
        media.issue(&session).unwrap();

        clock.advance(MEDIA_TOKEN_TTL + Duration::from_secs(1));
        assert_eq!(media.sweep_expired(), 1);
        assert!(media.is_empty());
    }
}
