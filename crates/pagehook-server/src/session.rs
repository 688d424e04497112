//! In-memory session store with TTL expiry.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use pagehook_core::traits::SessionStore;

struct SessionEntry {
    values: HashMap<String, Value>,
    user: Option<Value>,
    expires_at: DateTime<Utc>,
}

/// Process-local [`SessionStore`] backend.
///
/// Entries expire `ttl_seconds` after their last write; expired entries
/// are reaped lazily on the next access to the same session id.
pub struct InMemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl InMemorySessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_seconds as i64),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Removes an expired entry for `sid`, then hands the live entry (or
    /// a fresh one) to `f`.
    async fn with_entry<R>(&self, sid: &str, f: impl FnOnce(&mut SessionEntry) -> R) -> R {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();

        if sessions.get(sid).is_some_and(|e| e.expires_at <= now) {
            debug!(sid, "Session expired, dropping");
            sessions.remove(sid);
        }

        let entry = sessions.entry(sid.to_string()).or_insert_with(|| SessionEntry {
            values: HashMap::new(),
            user: None,
            expires_at: now + self.ttl,
        });
        entry.expires_at = now + self.ttl;
        f(entry)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, sid: &str, key: &str) -> Option<Value> {
        self.with_entry(sid, |e| e.values.get(key).cloned()).await
    }

    async fn set(&self, sid: &str, key: &str, value: Value) {
        self.with_entry(sid, |e| {
            e.values.insert(key.to_string(), value);
        })
        .await;
    }

    async fn pop(&self, sid: &str, key: &str) -> Option<Value> {
        self.with_entry(sid, |e| e.values.remove(key)).await
    }

    async fn auth(&self, sid: &str, user: Value) {
        self.with_entry(sid, |e| {
            e.user = Some(user);
        })
        .await;
    }

    async fn user(&self, sid: &str) -> Option<Value> {
        self.with_entry(sid, |e| e.user.clone()).await
    }

    async fn logout(&self, sid: &str) {
        self.with_entry(sid, |e| {
            e.user = None;
        })
        .await;
    }

    async fn reset(&self, sid: &str) {
        self.sessions.write().await.remove(sid);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_set_get_pop() {
        let store = InMemorySessionStore::new(60);
        store.set("s1", "flash", json!("saved")).await;
        assert_eq!(store.get("s1", "flash").await, Some(json!("saved")));
        assert_eq!(store.pop("s1", "flash").await, Some(json!("saved")));
        assert_eq!(store.pop("s1", "flash").await, None);
        assert_eq!(store.get("s2", "flash").await, None);
    }

    #[tokio::test]
    async fn test_logout_clears_only_the_user_slot() {
        let store = InMemorySessionStore::new(60);
        store.set("s1", "theme", json!("dark")).await;
        store.auth("s1", json!({"email": "a@b.c"})).await;
        assert!(store.is_logged_in("s1").await);

        store.logout("s1").await;
        assert!(!store.is_logged_in("s1").await);
        assert_eq!(store.get("s1", "theme").await, Some(json!("dark")));
    }

    #[tokio::test]
    async fn test_reset_destroys_everything() {
        let store = InMemorySessionStore::new(60);
        store.set("s1", "theme", json!("dark")).await;
        store.auth("s1", json!({"email": "a@b.c"})).await;

        store.reset("s1").await;
        assert_eq!(store.get("s1", "theme").await, None);
        assert!(!store.is_logged_in("s1").await);
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let store = InMemorySessionStore::new(0);
        store.set("s1", "theme", json!("dark")).await;
        assert_eq!(store.get("s1", "theme").await, None);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_by_id() {
        let store = InMemorySessionStore::new(60);
        store.auth("s1", json!({"email": "a@b.c"})).await;
        assert!(!store.is_logged_in("s2").await);
    }
}
