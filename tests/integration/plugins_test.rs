//! Manifest-driven plugin activation through the full stack.

use axum::http::StatusCode;

use crate::helpers::{TestApp, body_string};

#[tokio::test]
async fn test_inactive_plugin_leaves_nothing_to_render() {
    let app = TestApp::with_manifests(&[
        (
            "header-footer",
            r#"{"id": "header-footer", "active": false, "routes": {"on": ["all"]}}"#,
        ),
        (
            "basic-auth",
            r#"{"id": "basic-auth", "active": true, "routes": {"on": ["login"]}}"#,
        ),
    ]);

    // Only basic-auth is active and it is scoped to /login.
    let response = app.get("/home").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app.get("/login").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_off_rule_denies_even_with_wildcard() {
    let app = TestApp::with_manifests(&[(
        "header-footer",
        r#"{"id": "header-footer", "active": true, "routes": {"on": ["all"], "off": ["secret"]}}"#,
    )]);

    let response = app.get("/home").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/secret").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_manifest_without_compiled_plugin_is_skipped() {
    let mut manifests = crate::helpers::DEFAULT_MANIFESTS.to_vec();
    manifests.push((
        "ghost",
        r#"{"id": "ghost", "active": true, "routes": {"on": ["all"]}}"#,
    ));
    let app = TestApp::with_manifests(&manifests);

    let response = app.get("/home").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_route_scoped_plugin_does_not_leak_onto_other_pages() {
    let app = TestApp::new();

    let body = body_string(app.get("/home").await).await;
    assert!(!body.contains("<form"), "login form leaked: {body}");
}

#[tokio::test]
async fn test_malformed_manifest_skips_only_that_plugin() {
    let app = TestApp::with_manifests(&[
        ("header-footer", r#"{"id": "header-footer", "active""#),
        (
            "basic-auth",
            r#"{"id": "basic-auth", "active": true, "routes": {"on": ["login"]}}"#,
        ),
    ]);

    // header-footer's manifest is unreadable; basic-auth still serves /login.
    let response = app.get("/login").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains(r#"name="csrf""#));
    assert!(!body.contains("<nav>"));
}
