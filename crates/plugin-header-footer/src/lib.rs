//! Site chrome plugin: header with navigation, page bodies for the
//! built-in pages, and a footer.
//!
//! Active on every route (`routes.on = ["all"]`), so this plugin is what
//! keeps a fresh install rendering at all.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use pagehook_core::error::AppError;
use pagehook_core::types::Pager;
use pagehook_plugin::context::escape_html;
use pagehook_plugin::hooks::points;
use pagehook_plugin::{ActionHandler, HookBinder, PageContext, Plugin, PluginAssets};

/// Value-store key carrying the profile row from controller to view.
const PROFILE_VALUE_KEY: &str = "profile";
/// Value-store key carrying the current page of posts to the view.
const POSTS_VALUE_KEY: &str = "posts";
/// Posts shown per page on the posts listing.
const POSTS_PER_PAGE: u64 = 5;

/// Header, footer, and the stock pages (home, profile, not-found).
pub struct HeaderFooterPlugin;

impl HeaderFooterPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeaderFooterPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for HeaderFooterPlugin {
    fn id(&self) -> &str {
        "header-footer"
    }

    async fn register(
        &self,
        hooks: &mut HookBinder<'_>,
        assets: &PluginAssets,
    ) -> Result<(), AppError> {
        hooks.action(
            points::BEFORE_VIEW,
            10,
            Arc::new(EmitHeader {
                stylesheet_url: assets.url("css/style.css"),
            }),
        );
        hooks.action(points::CONTROLLER, 10, Arc::new(LoadProfile));
        hooks.action(points::CONTROLLER, 10, Arc::new(LoadPosts));
        hooks.action(points::VIEW, 10, Arc::new(RenderPage));
        hooks.action(points::AFTER_VIEW, 10, Arc::new(EmitFooter));
        Ok(())
    }
}

/// Opens the document and renders the navigation bar.
struct EmitHeader {
    stylesheet_url: String,
}

#[async_trait]
impl ActionHandler for EmitHeader {
    async fn handle(&self, ctx: &mut PageContext, _payload: &Value) -> Result<(), AppError> {
        let auth_link = if ctx.session().is_logged_in().await {
            r#"<a href="/login?action=logout">Logout</a>"#
        } else {
            r#"<a href="/login">Login</a>"#
        };
        ctx.echo(format!(
            concat!(
                "<!DOCTYPE html>\n<html>\n<head>\n",
                "<link rel=\"stylesheet\" href=\"{}\">\n",
                "</head>\n<body>\n",
                "<nav><a href=\"/\">Home</a> <a href=\"/posts\">Posts</a> <a href=\"/profile\">Profile</a> {}</nav>\n",
            ),
            self.stylesheet_url, auth_link,
        ));
        Ok(())
    }
}

/// Loads the profile row into the shared value store for the view phase.
struct LoadProfile;

#[async_trait]
impl ActionHandler for LoadProfile {
    async fn handle(&self, ctx: &mut PageContext, _payload: &Value) -> Result<(), AppError> {
        if ctx.page_id() != "profile" {
            return Ok(());
        }

        match ctx.rows().get_row("profiles", &Default::default()).await? {
            Some(row) => {
                debug!("Profile row loaded");
                ctx.set_value(PROFILE_VALUE_KEY, Value::Object(row));
            }
            None => debug!("No profile row present"),
        }
        Ok(())
    }
}

/// Loads one page of posts plus the pager links the view needs.
struct LoadPosts;

#[async_trait]
impl ActionHandler for LoadPosts {
    async fn handle(&self, ctx: &mut PageContext, _payload: &Value) -> Result<(), AppError> {
        if ctx.page_id() != "posts" {
            return Ok(());
        }

        let pager = Pager::from_query(ctx.params().get("page"), POSTS_PER_PAGE);
        let rows = ctx.rows();
        let all = rows.query("posts", &Default::default()).await?;
        let total = all.len() as u64;

        let items: Vec<Value> = all
            .into_iter()
            .skip(pager.offset as usize)
            .take(pager.limit as usize)
            .map(Value::Object)
            .collect();
        debug!(page = pager.page, shown = items.len(), total, "Posts page loaded");

        let prev = (pager.page > 1).then(|| pager.prev_link("/posts"));
        let next = (pager.offset + pager.limit < total).then(|| pager.next_link("/posts"));
        ctx.set_value(
            POSTS_VALUE_KEY,
            serde_json::json!({ "items": items, "prev": prev, "next": next }),
        );
        Ok(())
    }
}

/// Body content for the pages this plugin owns.
struct RenderPage;

#[async_trait]
impl ActionHandler for RenderPage {
    async fn handle(&self, ctx: &mut PageContext, _payload: &Value) -> Result<(), AppError> {
        match ctx.page_id() {
            "" | "home" => {
                ctx.echo("<h1>Home</h1>\n<p>Welcome to this Pagehook site.</p>\n");
            }
            "profile" => {
                let body = render_profile(ctx.get_value(PROFILE_VALUE_KEY));
                ctx.echo(body);
            }
            "posts" => {
                let body = render_posts(ctx.get_value(POSTS_VALUE_KEY));
                ctx.echo(body);
            }
            "404" => {
                ctx.echo("<h1>Page not found</h1>\n<p>The page you requested does not exist.</p>\n");
            }
            _ => {}
        }
        Ok(())
    }
}

fn render_profile(profile: Option<&Value>) -> String {
    let Some(Value::Object(row)) = profile else {
        return "<h1>Profile</h1>\n<p>No profile has been created yet.</p>\n".to_string();
    };

    let field = |key: &str| {
        row.get(key)
            .and_then(Value::as_str)
            .map(escape_html)
            .unwrap_or_default()
    };
    format!(
        "<h1>{}</h1>\n<p>{}</p>\n",
        field("name"),
        field("bio"),
    )
}

fn render_posts(posts: Option<&Value>) -> String {
    let Some(Value::Object(data)) = posts else {
        return "<h1>Posts</h1>\n<p>Nothing has been posted yet.</p>\n".to_string();
    };

    let mut out = String::from("<h1>Posts</h1>\n");
    match data.get("items").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => {
            out.push_str("<ul>\n");
            for item in items {
                let title = item
                    .get("title")
                    .and_then(Value::as_str)
                    .map(escape_html)
                    .unwrap_or_default();
                out.push_str(&format!("<li>{title}</li>\n"));
            }
            out.push_str("</ul>\n");
        }
        _ => out.push_str("<p>Nothing has been posted yet.</p>\n"),
    }

    for (key, label) in [("prev", "Newer"), ("next", "Older")] {
        if let Some(url) = data.get(key).and_then(Value::as_str) {
            out.push_str(&format!("<a href=\"{}\">{label}</a>\n", escape_html(url)));
        }
    }
    out
}

/// Closes the document.
struct EmitFooter;

#[async_trait]
impl ActionHandler for EmitFooter {
    async fn handle(&self, ctx: &mut PageContext, _payload: &Value) -> Result<(), AppError> {
        ctx.echo("<footer>Powered by Pagehook</footer>\n</body>\n</html>\n");
        Ok(())
    }
}
