//! Per-request page context passed to every action handler.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use pagehook_core::traits::{Row, RowStore, SessionStore};
use pagehook_core::types::{RequestParams, RoutePath};

/// Session-key under which the pending CSRF token is stored.
const CSRF_SESSION_KEY: &str = "csrf";
/// Form-field name used by [`PageContext::csrf_field`].
const CSRF_FIELD_NAME: &str = "csrf";

/// A session store bound to the current request's session id.
#[derive(Clone)]
pub struct SessionHandle {
    store: Arc<dyn SessionStore>,
    sid: String,
}

impl SessionHandle {
    /// Binds `store` to the session `sid`.
    pub fn new(store: Arc<dyn SessionStore>, sid: impl Into<String>) -> Self {
        Self {
            store,
            sid: sid.into(),
        }
    }

    /// The session id this handle is bound to.
    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// Read a session value.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.store.get(&self.sid, key).await
    }

    /// Store a session value.
    pub async fn set(&self, key: &str, value: Value) {
        self.store.set(&self.sid, key, value).await;
    }

    /// Read and remove a session value in one step.
    pub async fn pop(&self, key: &str) -> Option<Value> {
        self.store.pop(&self.sid, key).await
    }

    /// Record the authenticated user.
    pub async fn auth(&self, user: Value) {
        self.store.auth(&self.sid, user).await;
    }

    /// The authenticated user, if any.
    pub async fn user(&self) -> Option<Value> {
        self.store.user(&self.sid).await
    }

    /// Whether a user is authenticated.
    pub async fn is_logged_in(&self) -> bool {
        self.store.is_logged_in(&self.sid).await
    }

    /// Clear the authenticated-user slot only.
    pub async fn logout(&self) {
        self.store.logout(&self.sid).await;
    }

    /// Destroy all data for this session.
    pub async fn reset(&self) {
        self.store.reset(&self.sid).await;
    }
}

/// Everything a hook callback can see and touch for the current request.
///
/// One context is built per request and threaded mutably through every
/// action handler. The output buffer is append-only: handlers emit HTML
/// with [`echo`](Self::echo) and nothing ever removes earlier output,
/// which is what makes the lifecycle controller's view-delta computation
/// a plain suffix.
pub struct PageContext {
    route: RoutePath,
    params: RequestParams,
    session: SessionHandle,
    rows: Arc<dyn RowStore>,
    values: Row,
    out: String,
    redirect_to: Option<String>,
}

impl PageContext {
    /// Builds the context for one request.
    pub fn new(
        route: RoutePath,
        params: RequestParams,
        session: SessionHandle,
        rows: Arc<dyn RowStore>,
    ) -> Self {
        Self {
            route,
            params,
            session,
            rows,
            values: Row::new(),
            out: String::new(),
            redirect_to: None,
        }
    }

    /// The page identifier: first path segment, `""` for the site root.
    pub fn page_id(&self) -> &str {
        self.route.page_id()
    }

    /// The decomposed request path.
    pub fn route(&self) -> &RoutePath {
        &self.route
    }

    /// GET/POST/file parameters.
    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    /// The session bound to this request.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// The row store collaborator.
    pub fn rows(&self) -> Arc<dyn RowStore> {
        Arc::clone(&self.rows)
    }

    // ── Output buffer ────────────────────────────────────────────

    /// Appends to the response body.
    pub fn echo(&mut self, html: impl AsRef<str>) {
        self.out.push_str(html.as_ref());
    }

    /// Everything emitted so far.
    pub fn output(&self) -> &str {
        &self.out
    }

    /// Takes the accumulated output, leaving the buffer empty.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    // ── Shared value store ───────────────────────────────────────

    /// Stores a value for later hooks in the same request (for example
    /// controller → view handoff).
    pub fn set_value(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Reads a value stored earlier in the same request.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    // ── Redirects ────────────────────────────────────────────────

    /// Requests a redirect to another page identifier.
    ///
    /// Dispatch stops after the current handler returns and the
    /// lifecycle controller terminates the remaining phases.
    pub fn redirect(&mut self, page: impl Into<String>) {
        self.redirect_to = Some(page.into());
    }

    /// The pending redirect target, if a handler requested one.
    pub fn redirect_requested(&self) -> Option<&str> {
        self.redirect_to.as_deref()
    }

    // ── Form helpers ─────────────────────────────────────────────

    /// Previously submitted value for a form field, HTML-escaped, with a
    /// fallback for first renders.
    pub fn old_value(&self, key: &str, default: &str) -> String {
        escape_html(self.params.input(key, default))
    }

    /// `selected` attribute when the submitted value of `key` matches.
    pub fn old_selected(&self, key: &str, value: &str) -> &'static str {
        if self.params.post(key) == value {
            "selected"
        } else {
            ""
        }
    }

    /// `checked` attribute when the submitted value of `key` matches.
    pub fn old_checked(&self, key: &str, value: &str) -> &'static str {
        if self.params.post(key) == value {
            "checked"
        } else {
            ""
        }
    }

    // ── CSRF ─────────────────────────────────────────────────────

    /// Mints a CSRF token, stores it in the session, and returns the
    /// hidden-input fragment carrying it.
    pub async fn csrf_field(&self) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.session
            .set(CSRF_SESSION_KEY, Value::String(token.clone()))
            .await;
        format!(r#"<input type="hidden" name="{CSRF_FIELD_NAME}" value="{token}">"#)
    }

    /// Verifies the submitted CSRF token against the session.
    ///
    /// The stored token is consumed either way: a token survives exactly
    /// one verification attempt.
    pub async fn csrf_verify(&self) -> bool {
        let submitted = self.params.post(CSRF_FIELD_NAME);
        let stored = self.session.pop(CSRF_SESSION_KEY).await;
        match stored {
            Some(Value::String(token)) => !submitted.is_empty() && submitted == token,
            _ => false,
        }
    }
}

/// Minimal HTML attribute/text escaping for echoed form values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
