//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use pagehook_core::config::AppConfig;
use pagehook_core::traits::{Row, RowStore};
use pagehook_database::MemoryRowStore;
use pagehook_plugin::PluginLoader;
use pagehook_server::{AppState, InMemorySessionStore, build_app};
use plugin_basic_auth::BasicAuthPlugin;
use plugin_header_footer::HeaderFooterPlugin;

/// Manifests for both demo plugins, active on their usual routes.
pub const DEFAULT_MANIFESTS: &[(&str, &str)] = &[
    (
        "header-footer",
        r#"{"id": "header-footer", "active": true, "routes": {"on": ["all"]}}"#,
    ),
    (
        "basic-auth",
        r#"{"id": "basic-auth", "active": true, "routes": {"on": ["login"]}}"#,
    ),
];

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Row store for seeding fixtures
    pub rows: Arc<MemoryRowStore>,
    /// Plugin directory backing the loader; dropped with the app
    _plugins_dir: TempDir,
}

impl TestApp {
    /// App with both demo plugins active.
    pub fn new() -> Self {
        Self::with_manifests(DEFAULT_MANIFESTS)
    }

    /// App whose plugin directory holds exactly the given manifests.
    pub fn with_manifests(manifests: &[(&str, &str)]) -> Self {
        let plugins_dir = tempfile::tempdir().expect("tempdir");
        for (dir_name, manifest) in manifests {
            let dir = plugins_dir.path().join(dir_name);
            std::fs::create_dir_all(&dir).expect("plugin dir");
            std::fs::write(dir.join("plugin.json"), manifest).expect("manifest");
        }

        let config = AppConfig::default();
        let loader = PluginLoader::new(plugins_dir.path(), &config.site.root_url)
            .with_plugin(Arc::new(HeaderFooterPlugin::new()))
            .with_plugin(Arc::new(BasicAuthPlugin::new()));

        let rows = Arc::new(MemoryRowStore::new());
        let state = AppState {
            config: Arc::new(config),
            sessions: Arc::new(InMemorySessionStore::new(60)),
            rows: Arc::clone(&rows) as Arc<dyn RowStore>,
            loader: Arc::new(loader),
        };

        Self {
            router: build_app(state),
            rows,
            _plugins_dir: plugins_dir,
        }
    }

    /// Seed a user row for login tests.
    pub async fn seed_user(&self, email: &str, password: &str) {
        let mut row = Row::new();
        row.insert("email".to_string(), serde_json::json!(email));
        row.insert("password".to_string(), serde_json::json!(password));
        self.rows.insert("users", row).await.expect("seed user");
    }

    pub async fn get(&self, path: &str) -> Response<Body> {
        self.get_with_cookie(path, None).await
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> Response<Body> {
        let body: String = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencode(k), urlencode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::from(body)).expect("request"))
            .await
            .expect("response")
    }
}

/// The `name=value` pair of the issued session cookie, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let raw = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(str::to_string)
}

/// The redirect target of a response, if any.
pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(axum::http::header::LOCATION)?
        .to_str()
        .ok()
        .map(str::to_string)
}

/// Collect the response body into a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// The CSRF token embedded in a rendered login form.
pub fn csrf_token(body: &str) -> String {
    body.split(r#"name="csrf" value=""#)
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .expect("csrf token in form")
        .to_string()
}

/// Form-field percent encoding, enough for the values these tests send.
fn urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
