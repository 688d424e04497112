//! Login page plugin.
//!
//! Active on the `login` route only. The controller phase handles form
//! submission and logout, the view phase renders the login form with
//! CSRF protection and old-value repopulation. Credentials are checked
//! against the `users` table of the row store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use pagehook_core::error::AppError;
use pagehook_plugin::context::escape_html;
use pagehook_plugin::hooks::points;
use pagehook_plugin::{ActionHandler, HookBinder, PageContext, Plugin, PluginAssets};

/// Value-store key carrying a login failure message to the view.
const LOGIN_ERROR_KEY: &str = "login_error";

/// Email/password login against the row store.
pub struct BasicAuthPlugin;

impl BasicAuthPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BasicAuthPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for BasicAuthPlugin {
    fn id(&self) -> &str {
        "basic-auth"
    }

    async fn register(
        &self,
        hooks: &mut HookBinder<'_>,
        _assets: &PluginAssets,
    ) -> Result<(), AppError> {
        hooks.action(points::CONTROLLER, 10, Arc::new(HandleLogin));
        hooks.action(points::VIEW, 10, Arc::new(RenderLogin));
        Ok(())
    }
}

/// Processes logout requests and login form submissions.
struct HandleLogin;

#[async_trait]
impl ActionHandler for HandleLogin {
    async fn handle(&self, ctx: &mut PageContext, _payload: &Value) -> Result<(), AppError> {
        if ctx.params().get("action") == "logout" {
            ctx.session().logout().await;
            info!("User logged out");
            ctx.redirect("");
            return Ok(());
        }

        if !ctx.params().posted() {
            return Ok(());
        }

        if !ctx.csrf_verify().await {
            debug!("Login rejected, CSRF token mismatch");
            ctx.set_value(
                LOGIN_ERROR_KEY,
                Value::String("Your form expired, please try again.".to_string()),
            );
            return Ok(());
        }

        let email = ctx.params().post("email").to_string();
        let password = ctx.params().post("password");

        let mut where_eq = pagehook_core::traits::Row::new();
        where_eq.insert("email".to_string(), Value::String(email.clone()));
        let user = ctx.rows().get_row("users", &where_eq).await?;

        match user {
            Some(row)
                if !password.is_empty()
                    && row.get("password").and_then(Value::as_str) == Some(password) =>
            {
                info!(email, "Login succeeded");
                ctx.session().auth(Value::Object(row)).await;
                ctx.redirect("");
            }
            _ => {
                debug!(email, "Login failed");
                ctx.set_value(
                    LOGIN_ERROR_KEY,
                    Value::String("Invalid email or password.".to_string()),
                );
            }
        }
        Ok(())
    }
}

/// Renders the login form, or the logged-in state.
struct RenderLogin;

#[async_trait]
impl ActionHandler for RenderLogin {
    async fn handle(&self, ctx: &mut PageContext, _payload: &Value) -> Result<(), AppError> {
        if let Some(user) = ctx.session().user().await {
            let email = user
                .get("email")
                .and_then(Value::as_str)
                .map(escape_html)
                .unwrap_or_default();
            ctx.echo(format!(
                "<h1>Login</h1>\n<p>You are logged in as {email}.</p>\n\
                 <p><a href=\"/login?action=logout\">Logout</a></p>\n"
            ));
            return Ok(());
        }

        let error_block = match ctx.get_value(LOGIN_ERROR_KEY) {
            Some(Value::String(message)) => {
                format!("<p class=\"error\">{}</p>\n", escape_html(message))
            }
            _ => String::new(),
        };
        let csrf = ctx.csrf_field().await;
        let email = ctx.old_value("email", "");
        let remember = ctx.old_checked("remember", "1");

        ctx.echo(format!(
            "<h1>Login</h1>\n{error_block}\
             <form method=\"post\" action=\"/login\">\n\
             {csrf}\n\
             <label>Email <input type=\"email\" name=\"email\" value=\"{email}\"></label>\n\
             <label>Password <input type=\"password\" name=\"password\"></label>\n\
             <label><input type=\"checkbox\" name=\"remember\" value=\"1\" {remember}> Remember me</label>\n\
             <button type=\"submit\">Sign in</button>\n\
             </form>\n"
        ));
        Ok(())
    }
}
