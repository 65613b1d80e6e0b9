use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::AppError;

/// A live login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Server-held sessions keyed by session id.
///
/// This is the only state shared between requests besides the record stores.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Opens a session for `user_id` and returns its id and expiry.
    ///
    /// Expired sessions are dropped on the way. A TTL that overflows the
    /// calendar is an error rather than a panic.
    pub fn create(&self, user_id: i64) -> Result<(String, Session), AppError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::InternalServerError("Session lifetime out of range".into())
        })?;
        let sid = Uuid::new_v4().to_string();
        let session = Session {
            user_id,
            expires_at,
        };

        let mut sessions = self.sessions.lock();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(sid.clone(), session.clone());
        Ok((sid, session))
    }

    /// Resolves a session id, `None` if unknown, revoked or expired.
    pub fn get(&self, sid: &str) -> Option<Session> {
        let mut sessions = self.sessions.lock();
        match sessions.get(sid) {
            Some(session) if session.expires_at > Utc::now() => Some(session.clone()),
            Some(_) => {
                sessions.remove(sid);
                None
            }
            None => None,
        }
    }

    /// Ends a session. Unknown ids are ignored.
    pub fn revoke(&self, sid: &str) {
        self.sessions.lock().remove(sid);
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_get_revoke() {
        let store = SessionStore::new(Duration::hours(1));
        let (sid, session) = store.create(5).unwrap();

        assert_eq!(session.user_id, 5);
        assert_eq!(store.get(&sid), Some(session));

        store.revoke(&sid);
        assert!(store.get(&sid).is_none());
        store.revoke(&sid);
        assert!(store.is_empty());
    }

    #[test]
    fn test_session_ids_are_unique_per_login() {
        let store = SessionStore::new(Duration::hours(1));
        let (first, _) = store.create(1).unwrap();
        let (second, _) = store.create(1).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_expired_session_is_rejected_and_purged() {
        let store = SessionStore::new(Duration::seconds(-1));
        let (sid, _) = store.create(9).unwrap();
        assert!(store.get(&sid).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_overflowing_ttl_is_an_error() {
        let store = SessionStore::new(Duration::hours(2_500_000_000));
        match store.create(1) {
            Err(AppError::InternalServerError(msg)) => assert!(msg.contains("out of range")),
            other => panic!("expected an error, got {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_sessions_are_swept_on_create() {
        let expired = SessionStore::new(Duration::seconds(-1));
        expired.create(1).unwrap();
        expired.create(2).unwrap();
        // Creating a third sweeps the first two, the third is itself already stale.
        expired.create(3).unwrap();
        assert_eq!(expired.len(), 1);
    }
}
