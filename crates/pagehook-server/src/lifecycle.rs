//! Page lifecycle controller.
//!
//! Drives the six hook phases of a request in order and decides whether
//! the page rendered anything worth returning.

use serde_json::Value;
use tracing::{debug, info};

use pagehook_core::error::AppError;
use pagehook_core::types::LifecyclePhase;
use pagehook_core::AppResult;
use pagehook_plugin::hooks::points;
use pagehook_plugin::{HookRegistry, PageContext};

/// How a request ends after the lifecycle has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// The accumulated page body, returned as-is.
    Rendered(String),
    /// Redirect to this page identifier, discarding any buffered body.
    Redirect(String),
}

/// Fires the lifecycle hooks against a per-request registry and context.
pub struct Lifecycle {
    not_found_route: String,
}

impl Lifecycle {
    pub fn new(not_found_route: impl Into<String>) -> Self {
        Self {
            not_found_route: not_found_route.into(),
        }
    }

    /// Runs every phase from `before_controller` through `after_view`.
    ///
    /// The output buffer is append-only, so the view's contribution is
    /// the exact suffix written after the pre-view snapshot. A silent
    /// view sends the request to the not-found route instead of serving
    /// header-and-footer chrome around nothing; the not-found route
    /// itself is exempt so an unpopulated 404 page cannot loop.
    ///
    /// A redirect requested by any handler terminates the remaining
    /// phases immediately.
    pub async fn run(
        &self,
        registry: &HookRegistry,
        mut ctx: PageContext,
    ) -> AppResult<LifecycleOutcome> {
        let mut phase = LifecyclePhase::FIRST;
        let mut view_emitted = false;

        while let Some(hook) = phase.hook_name() {
            if phase == LifecyclePhase::View {
                let baseline = ctx.output().len();
                registry.fire_action(hook, &mut ctx, &Value::Null).await?;
                view_emitted = ctx.output().len() > baseline;
            } else {
                registry.fire_action(hook, &mut ctx, &Value::Null).await?;
            }

            if let Some(target) = ctx.redirect_requested() {
                debug!(%phase, target, "Redirect requested, terminating lifecycle");
                return Ok(LifecycleOutcome::Redirect(target.to_string()));
            }

            phase = phase.next();
        }

        if !view_emitted && ctx.page_id() != self.not_found_route {
            info!(
                page = ctx.page_id(),
                "View produced no output, redirecting to not-found route"
            );
            return Ok(LifecycleOutcome::Redirect(self.not_found_route.clone()));
        }

        // One last chance for plugins to rewrite the complete body.
        let body = ctx.take_output();
        let body = match registry
            .apply_filter(points::RENDER_OUTPUT, Value::String(body))
            .await?
        {
            Value::String(filtered) => filtered,
            other => other.to_string(),
        };
        Ok(LifecycleOutcome::Rendered(body))
    }
}
