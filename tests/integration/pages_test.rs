//! Page rendering and not-found behavior through the full stack.

use axum::http::StatusCode;

use crate::helpers::{TestApp, body_string, location, session_cookie};

#[tokio::test]
async fn test_home_page_renders_with_chrome() {
    let app = TestApp::new();

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_some());

    let body = body_string(response).await;
    assert!(body.contains("<nav>"), "header missing: {body}");
    assert!(body.contains("<h1>Home</h1>"));
    assert!(body.contains("<footer>"));
    assert!(body.ends_with("</html>\n"));
}

#[tokio::test]
async fn test_named_home_route_matches_root() {
    let app = TestApp::new();
    let body = body_string(app.get("/home").await).await;
    assert!(body.contains("<h1>Home</h1>"));
}

#[tokio::test]
async fn test_unknown_page_redirects_to_not_found() {
    let app = TestApp::new();

    let response = app.get("/no-such-page").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("http://localhost:8080/404")
    );
}

#[tokio::test]
async fn test_not_found_page_renders_without_looping() {
    let app = TestApp::new();

    let response = app.get("/404").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Page not found"));
}

#[tokio::test]
async fn test_profile_page_shows_placeholder_then_row() {
    let app = TestApp::new();

    let body = body_string(app.get("/profile").await).await;
    assert!(body.contains("No profile has been created yet"));

    let mut row = pagehook_core::traits::Row::new();
    row.insert("name".to_string(), serde_json::json!("Mary"));
    row.insert("bio".to_string(), serde_json::json!("Rust developer"));
    {
        use pagehook_core::traits::RowStore;
        app.rows.insert("profiles", row).await.expect("seed");
    }

    let body = body_string(app.get("/profile").await).await;
    assert!(body.contains("<h1>Mary</h1>"));
    assert!(body.contains("Rust developer"));
}

#[tokio::test]
async fn test_posts_page_paginates_by_query_parameter() {
    let app = TestApp::new();

    {
        use pagehook_core::traits::{Row, RowStore};
        for i in 1..=7 {
            let mut row = Row::new();
            row.insert("title".to_string(), serde_json::json!(format!("Post {i}")));
            app.rows.insert("posts", row).await.expect("seed post");
        }
    }

    let body = body_string(app.get("/posts").await).await;
    assert_eq!(body.matches("<li>").count(), 5, "body: {body}");
    assert!(body.contains(r#"<a href="/posts?page=2">Older</a>"#));

    let body = body_string(app.get("/posts?page=2").await).await;
    assert_eq!(body.matches("<li>").count(), 2, "body: {body}");
    assert!(body.contains("Post 7"));
    assert!(body.contains(r#"<a href="/posts?page=1">Newer</a>"#));
}

#[tokio::test]
async fn test_deep_paths_route_by_first_segment() {
    let app = TestApp::new();
    let body = body_string(app.get("/home/extra/segments").await).await;
    assert!(body.contains("<h1>Home</h1>"));
}
