use std::sync::Arc;

use chrono::Duration;

use crate::auth::{Identity, SessionStore, TokenKeys};
use crate::error::AppError;
use crate::store::{MemoryStore, PgStore, TaskStore, UserStore};

/// Everything a request handler needs, built once at startup and shared
/// through `web::Data`.
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub sessions: SessionStore,
    pub keys: TokenKeys,
    backend: &'static str,
}

impl AppState {
    pub fn in_memory(secret: &str, session_ttl: Duration) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            tasks: store,
            sessions: SessionStore::new(session_ttl),
            keys: TokenKeys::new(secret),
            backend: "memory",
        }
    }

    pub fn postgres(store: PgStore, secret: &str, session_ttl: Duration) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            tasks: store,
            sessions: SessionStore::new(session_ttl),
            keys: TokenKeys::new(secret),
            backend: "postgres",
        }
    }

    /// Name of the active storage backend.
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Opens a session for `user_id` and returns the signed token the client keeps.
    pub fn start_session(&self, user_id: i64) -> Result<String, AppError> {
        let (sid, session) = self.sessions.create(user_id)?;
        self.keys.sign(&sid, session.expires_at.timestamp() as usize)
    }

    /// Turns a client token back into the identity it stands for.
    pub fn resolve_session(&self, token: &str) -> Result<Identity, AppError> {
        let claims = self.keys.verify(token)?;
        let session = self
            .sessions
            .get(&claims.sid)
            .ok_or_else(|| AppError::Unauthorized("Session expired or logged out".into()))?;
        Ok(Identity {
            user_id: session.user_id,
            session_id: claims.sid,
        })
    }
}
