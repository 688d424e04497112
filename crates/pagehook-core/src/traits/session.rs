//! Session storage trait.

use async_trait::async_trait;
use serde_json::Value;

/// Per-session key/value storage plus an authenticated-user slot.
///
/// Keys live under a session id minted by the server and carried in a
/// cookie. `logout` clears only the user slot; other session data
/// survives until `reset` or expiry.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a value.
    async fn get(&self, sid: &str, key: &str) -> Option<Value>;

    /// Store a value.
    async fn set(&self, sid: &str, key: &str, value: Value);

    /// Read a value and remove it in one step (flash data, one-time
    /// tokens).
    async fn pop(&self, sid: &str, key: &str) -> Option<Value>;

    /// Record the authenticated user for this session.
    async fn auth(&self, sid: &str, user: Value);

    /// The authenticated user, if any.
    async fn user(&self, sid: &str) -> Option<Value>;

    /// Whether a user is authenticated on this session.
    async fn is_logged_in(&self, sid: &str) -> bool {
        self.user(sid).await.is_some()
    }

    /// Clear only the authenticated-user slot.
    async fn logout(&self, sid: &str);

    /// Destroy all data held for this session.
    async fn reset(&self, sid: &str);
}
