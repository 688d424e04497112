//! Login, logout, and CSRF behavior through the full stack.

use axum::http::StatusCode;

use crate::helpers::{TestApp, body_string, csrf_token, location, session_cookie};

#[tokio::test]
async fn test_login_form_renders_with_csrf_field() {
    let app = TestApp::new();

    let response = app.get("/login").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("<form method=\"post\""));
    assert!(body.contains(r#"name="csrf""#));
}

#[tokio::test]
async fn test_full_login_flow() {
    let app = TestApp::new();
    app.seed_user("mary@example.com", "hunter2").await;

    // First render: session cookie plus a fresh CSRF token.
    let response = app.get("/login").await;
    let cookie = session_cookie(&response).expect("session cookie");
    let token = csrf_token(&body_string(response).await);

    let response = app
        .post_form(
            "/login",
            &[
                ("csrf", &token),
                ("email", "mary@example.com"),
                ("password", "hunter2"),
            ],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("http://localhost:8080/")
    );

    // The session now carries the user; the header offers logout.
    let body = body_string(app.get_with_cookie("/home", Some(&cookie)).await).await;
    assert!(body.contains("Logout"));
}

#[tokio::test]
async fn test_wrong_password_shows_error_and_keeps_email() {
    let app = TestApp::new();
    app.seed_user("mary@example.com", "hunter2").await;

    let response = app.get("/login").await;
    let cookie = session_cookie(&response).expect("session cookie");
    let token = csrf_token(&body_string(response).await);

    let response = app
        .post_form(
            "/login",
            &[
                ("csrf", &token),
                ("email", "mary@example.com"),
                ("password", "wrong"),
            ],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Invalid email or password."));
    assert!(body.contains(r#"value="mary@example.com""#));
}

#[tokio::test]
async fn test_stale_csrf_token_is_rejected() {
    let app = TestApp::new();
    app.seed_user("mary@example.com", "hunter2").await;

    // No prior GET: the session holds no token.
    let response = app.get("/login").await;
    let cookie = session_cookie(&response).expect("session cookie");

    let response = app
        .post_form(
            "/login",
            &[
                ("csrf", "forged"),
                ("email", "mary@example.com"),
                ("password", "hunter2"),
            ],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Your form expired"));
}

#[tokio::test]
async fn test_logout_clears_the_session_user() {
    let app = TestApp::new();
    app.seed_user("mary@example.com", "hunter2").await;

    let response = app.get("/login").await;
    let cookie = session_cookie(&response).expect("session cookie");
    let token = csrf_token(&body_string(response).await);

    app.post_form(
        "/login",
        &[
            ("csrf", &token),
            ("email", "mary@example.com"),
            ("password", "hunter2"),
        ],
        Some(&cookie),
    )
    .await;

    let response = app
        .get_with_cookie("/login?action=logout", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = body_string(app.get_with_cookie("/home", Some(&cookie)).await).await;
    assert!(body.contains(">Login</a>"));
}
