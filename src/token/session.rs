//! Session token store.
//!
//! A session token is issued after a successful password check and gates
//! the account-level API. Tokens are opaque hex identifiers with a fixed
//! 24-hour lifetime; they are never renewed, only deleted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::clock::Clock;

/// Fixed session token lifetime (non-renewing).
pub const SESSION_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct SessionEntry {
    expires_at: Instant,
}

/// In-memory store of live session tokens.
///
/// All operations take the store's single lock, so issuance, validation,
/// revocation, and sweeps are linearizable with respect to each other.
pub struct SessionTokenStore {
    entries: Mutex<HashMap<String, SessionEntry>>,
    clock: Arc<dyn Clock>,
}

impl SessionTokenStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Issue a fresh session token with expiry = now + 24h.
    pub fn issue(&self) -> String {
        let token = generate_token();
        let expires_at = self.clock.now() + SESSION_TOKEN_TTL;
        self.entries
            .lock()
            .insert(token.clone(), SessionEntry { expires_at });
        token
    }

    /// Check whether `token` is live. Expired entries are deleted here;
    /// callers must not rely on the background sweep alone.
    pub fn validate(&self, token: &str) -> bool {
        let mut entries = self.entries.lock();
        match entries.get(token) {
            None => false,
            Some(entry) if self.clock.now() > entry.expires_at => {
                entries.remove(token);
                false
            }
            Some(_) => true,
        }
    }

    /// Delete `token` unconditionally. Revoking an absent token is a no-op.
    pub fn revoke(&self, token: &str) {
        self.entries.lock().remove(token);
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

/// 32 bytes from the thread-local CSPRNG, hex-encoded (64 chars).
/// Collision probability is negligible and not handled.
pub(crate) fn generate_token() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}
