//! Hook registry: plugins register handlers by hook name with priority
//! ordering.
//!
//! Built once per request. Registration happens while plugins load;
//! dispatch happens afterwards, during the lifecycle phases, so the
//! registry is never mutated while firing.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use pagehook_core::error::AppError;

use crate::context::PageContext;

/// Priority used when a caller does not care about ordering.
pub const DEFAULT_PRIORITY: i32 = 10;

/// An action hook handler: invoked for its side effects, typically
/// writing to the page output buffer. Return values are ignored; an
/// error aborts the request.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Handle one firing of the hook.
    async fn handle(&self, ctx: &mut PageContext, payload: &Value) -> Result<(), AppError>;
}

/// A filter hook handler: receives the current value and returns the
/// (possibly transformed) value passed to the next handler in line.
#[async_trait]
pub trait FilterHandler: Send + Sync {
    /// Transform the value.
    async fn filter(&self, value: Value) -> Result<Value, AppError>;
}

/// Adapter turning a plain closure into an [`ActionHandler`].
pub struct FnAction<F>(pub F);

#[async_trait]
impl<F> ActionHandler for FnAction<F>
where
    F: Fn(&mut PageContext, &Value) -> Result<(), AppError> + Send + Sync,
{
    async fn handle(&self, ctx: &mut PageContext, payload: &Value) -> Result<(), AppError> {
        (self.0)(ctx, payload)
    }
}

/// Adapter turning a plain closure into a [`FilterHandler`].
pub struct FnFilter<F>(pub F);

#[async_trait]
impl<F> FilterHandler for FnFilter<F>
where
    F: Fn(Value) -> Result<Value, AppError> + Send + Sync,
{
    async fn filter(&self, value: Value) -> Result<Value, AppError> {
        (self.0)(value)
    }
}

struct ActionEntry {
    plugin_id: String,
    handler: Arc<dyn ActionHandler>,
}

struct FilterEntry {
    plugin_id: String,
    handler: Arc<dyn FilterHandler>,
}

/// Per-request registry of action and filter handlers keyed by hook name.
///
/// Each hook name maps priorities to handlers in a `BTreeMap`, so firing
/// order is ascending priority by construction. Within one hook name no
/// two handlers share a priority: a registration that requests an
/// occupied slot is shifted upward until a free one is found, which
/// preserves the ordering of earlier registrants instead of silently
/// overwriting them.
#[derive(Default)]
pub struct HookRegistry {
    actions: HashMap<String, BTreeMap<i32, ActionEntry>>,
    filters: HashMap<String, BTreeMap<i32, FilterEntry>>,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action handler, returning the effective priority.
    ///
    /// When `priority` is already taken for `hook`, the next free integer
    /// above it is used, so repeated registrations at the default
    /// priority fire in registration order.
    pub fn register_action(
        &mut self,
        hook: &str,
        priority: i32,
        plugin_id: &str,
        handler: Arc<dyn ActionHandler>,
    ) -> i32 {
        let slots = self.actions.entry(hook.to_string()).or_default();
        let effective = next_free_slot(slots.keys(), priority);
        slots.insert(
            effective,
            ActionEntry {
                plugin_id: plugin_id.to_string(),
                handler,
            },
        );
        debug!(hook, plugin_id, priority = effective, "Action registered");
        effective
    }

    /// Registers a filter handler, returning the effective priority.
    pub fn register_filter(
        &mut self,
        hook: &str,
        priority: i32,
        plugin_id: &str,
        handler: Arc<dyn FilterHandler>,
    ) -> i32 {
        let slots = self.filters.entry(hook.to_string()).or_default();
        let effective = next_free_slot(slots.keys(), priority);
        slots.insert(
            effective,
            FilterEntry {
                plugin_id: plugin_id.to_string(),
                handler,
            },
        );
        debug!(hook, plugin_id, priority = effective, "Filter registered");
        effective
    }

    /// Fires all action handlers for `hook` in ascending priority order.
    ///
    /// A no-op when nothing is registered. A handler error propagates
    /// immediately and fails the request; there is no per-handler
    /// isolation. Firing also stops early once a handler has requested a
    /// redirect on the context, mirroring the original redirect-and-halt
    /// behavior.
    pub async fn fire_action(
        &self,
        hook: &str,
        ctx: &mut PageContext,
        payload: &Value,
    ) -> Result<(), AppError> {
        let Some(entries) = self.actions.get(hook) else {
            return Ok(());
        };

        debug!(hook, handlers = entries.len(), "Firing action hook");

        for (priority, entry) in entries {
            if ctx.redirect_requested().is_some() {
                debug!(hook, "Redirect pending, skipping remaining handlers");
                break;
            }
            entry.handler.handle(ctx, payload).await.map_err(|e| {
                debug!(
                    hook,
                    plugin_id = %entry.plugin_id,
                    priority,
                    error = %e,
                    "Action handler failed"
                );
                e
            })?;
        }

        Ok(())
    }

    /// Threads `value` through all filter handlers for `hook` in
    /// ascending priority order. Identity when none are registered.
    pub async fn apply_filter(&self, hook: &str, value: Value) -> Result<Value, AppError> {
        let Some(entries) = self.filters.get(hook) else {
            return Ok(value);
        };

        let mut current = value;
        for entry in entries.values() {
            current = entry.handler.filter(current).await?;
        }

        Ok(current)
    }

    /// Number of action handlers registered for a hook.
    pub fn action_count(&self, hook: &str) -> usize {
        self.actions.get(hook).map_or(0, BTreeMap::len)
    }

    /// Number of filter handlers registered for a hook.
    pub fn filter_count(&self, hook: &str) -> usize {
        self.filters.get(hook).map_or(0, BTreeMap::len)
    }

    /// Plugin ids registered for a hook, in firing order. Diagnostic.
    pub fn action_owners(&self, hook: &str) -> Vec<&str> {
        self.actions.get(hook).map_or_else(Vec::new, |entries| {
            entries.values().map(|e| e.plugin_id.as_str()).collect()
        })
    }
}

fn next_free_slot<'a>(taken: impl Iterator<Item = &'a i32>, requested: i32) -> i32 {
    let taken: std::collections::BTreeSet<i32> = taken.copied().collect();
    let mut slot = requested;
    while taken.contains(&slot) {
        slot += 1;
    }
    slot
}

/// Registration facade handed to one plugin while it loads.
///
/// Tags every registration with the owning plugin's id so dispatch logs
/// and diagnostics can name the responsible plugin.
pub struct HookBinder<'a> {
    registry: &'a mut HookRegistry,
    plugin_id: &'a str,
}

impl<'a> HookBinder<'a> {
    /// Creates a binder scoped to `plugin_id`.
    pub fn new(registry: &'a mut HookRegistry, plugin_id: &'a str) -> Self {
        Self {
            registry,
            plugin_id,
        }
    }

    /// Registers an action handler at the given priority.
    pub fn action(&mut self, hook: &str, priority: i32, handler: Arc<dyn ActionHandler>) -> i32 {
        self.registry
            .register_action(hook, priority, self.plugin_id, handler)
    }

    /// Registers an action handler at the default priority.
    pub fn action_default(&mut self, hook: &str, handler: Arc<dyn ActionHandler>) -> i32 {
        self.action(hook, DEFAULT_PRIORITY, handler)
    }

    /// Registers a filter handler at the given priority.
    pub fn filter(&mut self, hook: &str, priority: i32, handler: Arc<dyn FilterHandler>) -> i32 {
        self.registry
            .register_filter(hook, priority, self.plugin_id, handler)
    }
}
