//! Application builder and the catch-all page handler.

use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};
use uuid::Uuid;

use pagehook_core::types::RoutePath;
use pagehook_plugin::{HookRegistry, PageContext, SessionHandle};

use crate::extract::extract_params;
use crate::lifecycle::{Lifecycle, LifecycleOutcome};
use crate::response::{error_page, message_page};
use crate::state::AppState;

/// Builds the Axum application.
///
/// There are no named routes: every path is a page id resolved through
/// the plugin pipeline, so a single fallback handler serves the whole
/// site.
pub fn build_app(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.server.max_body_bytes);
    Router::new()
        .fallback(handle_page)
        .with_state(state)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
}

/// Serves one page request end to end.
async fn handle_page(State(state): State<AppState>, req: Request) -> Response {
    let route = RoutePath::parse(req.uri().path());
    let debug_mode = state.config.site.debug;

    let cookie_name = &state.config.session.cookie_name;
    let (sid, minted) = match cookie_sid(req.headers(), cookie_name) {
        Some(sid) => (sid, false),
        None => (Uuid::new_v4().simple().to_string(), true),
    };

    let params = match extract_params(req).await {
        Ok(params) => params,
        Err(e) => return error_page(&e, debug_mode),
    };

    // Fresh registry per request; plugins active for this page register
    // their hooks into it.
    let mut registry = HookRegistry::new();
    let loaded = match state.loader.load_active(route.page_id(), &mut registry).await {
        Ok(loaded) => loaded,
        Err(e) => return error_page(&e, debug_mode),
    };

    let response = if loaded == 0 {
        warn!(page = route.page_id(), "No plugins active, nothing can render");
        message_page(
            StatusCode::INTERNAL_SERVER_ERROR,
            "No active plugins",
            "No plugin is active for this page, so there is nothing to render it.",
        )
    } else {
        debug!(page = route.page_id(), plugins = loaded, "Running page lifecycle");
        let session = SessionHandle::new(Arc::clone(&state.sessions), sid.as_str());
        let ctx = PageContext::new(route, params, session, Arc::clone(&state.rows));

        let lifecycle = Lifecycle::new(&state.config.site.not_found_route);
        match lifecycle.run(&registry, ctx).await {
            Ok(LifecycleOutcome::Rendered(body)) => Html(body).into_response(),
            Ok(LifecycleOutcome::Redirect(target)) => {
                Redirect::to(&redirect_url(&state.config.site.root_url, &target)).into_response()
            }
            Err(e) => error_page(&e, debug_mode),
        }
    };

    if minted {
        with_session_cookie(response, cookie_name, &sid)
    } else {
        response
    }
}

/// The session id carried in the request's cookie header, if any.
fn cookie_sid(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| {
            pair.strip_prefix(cookie_name)?
                .strip_prefix('=')
                .map(str::to_string)
        })
        .filter(|sid| !sid.is_empty())
}

fn with_session_cookie(mut response: Response, cookie_name: &str, sid: &str) -> Response {
    let cookie = format!("{cookie_name}={sid}; Path=/; HttpOnly; SameSite=Lax");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

/// Absolute URL for a redirect target. Page ids are resolved against the
/// configured site root; full URLs pass through untouched.
fn redirect_url(root_url: &str, target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        return target.to_string();
    }
    format!(
        "{}/{}",
        root_url.trim_end_matches('/'),
        target.trim_start_matches('/')
    )
}
