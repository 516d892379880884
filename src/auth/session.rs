//! Server-held login state, independently lived from the signed token.
//!
//! The opaque session id handed to the client (as an HttpOnly cookie) is the
//! revocation handle: removing the entry invalidates the login even while
//! the token itself would still verify.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of a session cross-check. `NoSession` covers both "never logged
/// in / logged out" and "session past its lifetime"; expiry is checked
/// lazily at authorization time, never swept in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    Valid,
    NoSession,
    Mismatch,
}

pub struct SessionStore {
    lifetime: Duration,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Lifetime in whole seconds, for the cookie Max-Age attribute.
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime.num_seconds()
    }

    /// Establish a session for a freshly authenticated user. Returns the
    /// opaque identifier the client holds; the lifetime window is refreshed
    /// only by logging in again.
    pub fn start(&self, username: &str, user_id: i64) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let session = Session {
            username: username.to_string(),
            user_id,
            created_at: now,
            expires_at: now + self.lifetime,
        };
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, session);
        id
    }

    /// True iff a live session exists for `id` and names `expected_username`.
    pub fn check(&self, id: Uuid, expected_username: &str) -> SessionCheck {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        match sessions.get(&id) {
            Some(session) if session.expires_at > Utc::now() => {
                if session.username == expected_username {
                    SessionCheck::Valid
                } else {
                    SessionCheck::Mismatch
                }
            }
            _ => SessionCheck::NoSession,
        }
    }

    /// Clear all state for `id`. Idempotent; the only pre-expiry path to
    /// invalidating a login.
    pub fn end(&self, id: Uuid) {
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_session_checks_valid() {
        let store = SessionStore::new(Duration::hours(2));
        let id = store.start("admin", 1);
        assert_eq!(store.check(id, "admin"), SessionCheck::Valid);
    }

    #[test]
    fn username_mismatch_is_distinguished_from_no_session() {
        let store = SessionStore::new(Duration::hours(2));
        let id = store.start("admin", 1);
        assert_eq!(store.check(id, "test"), SessionCheck::Mismatch);
        assert_eq!(store.check(Uuid::new_v4(), "admin"), SessionCheck::NoSession);
    }

    #[test]
    fn ended_session_no_longer_checks() {
        let store = SessionStore::new(Duration::hours(2));
        let id = store.start("admin", 1);
        store.end(id);
        assert_eq!(store.check(id, "admin"), SessionCheck::NoSession);
        // end is idempotent
        store.end(id);
    }

    #[test]
    fn expired_session_fails_check() {
        let store = SessionStore::new(Duration::seconds(-1));
        let id = store.start("admin", 1);
        assert_eq!(store.check(id, "admin"), SessionCheck::NoSession);
    }
}
