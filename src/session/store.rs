use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Session;

/// In-memory session table keyed by the cookie's session id
#[derive(Debug)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    /// Longest accepted idle timeout: one year
    const MAX_IDLE_MINS: u64 = 365 * 24 * 60;

    pub fn new(idle_timeout_mins: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: Duration::minutes(idle_timeout_mins.min(Self::MAX_IDLE_MINS) as i64),
        }
    }

    pub async fn insert(&self, session: Session) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, session);
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Mutate a session in place; `None` when it does not exist
    pub async fn update<F, R>(&self, id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(id).map(f)
    }

    pub async fn remove(&self, id: &Uuid) -> Option<Session> {
        self.sessions.write().await.remove(id)
    }

    /// Drop sessions idle for longer than the timeout or past their token expiry
    pub async fn purge_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let idle_timeout = self.idle_timeout;
        sessions.retain(|_, s| now - s.last_seen <= idle_timeout && !s.is_expired(now));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!("Purged {} idle sessions", purged);
        }
        purged
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn session(now: DateTime<Utc>) -> Session {
        let t = encode(&Header::default(), &json!({"sub": "a@x.com"}), &EncodingKey::from_secret(b"k")).unwrap();
        Session::from_token(&t, now).unwrap()
    }

    #[tokio::test]
    async fn insert_get_update_remove() {
        let store = SessionStore::new(30);
        let now = Utc::now();
        let id = store.insert(session(now)).await;

        assert_eq!(store.get(&id).await.unwrap().email, "a@x.com");
        let changed = store.update(&id, |s| {
            s.nome = Some("Ana".into());
            s.display_name().to_string()
        });
        assert_eq!(changed.await.as_deref(), Some("Ana"));
        assert!(store.update(&Uuid::new_v4(), |_| ()).await.is_none());

        assert!(store.remove(&id).await.is_some());
        assert!(store.get(&id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn purge_drops_only_idle_sessions() {
        let store = SessionStore::new(30);
        let now = Utc::now();
        let fresh = store.insert(session(now)).await;
        let stale = store.insert(session(now - Duration::minutes(45))).await;

        assert_eq!(store.purge_idle(now).await, 1);
        assert!(store.get(&fresh).await.is_some());
        assert!(store.get(&stale).await.is_none());
    }
}
