//! # pagehook-plugin
//!
//! The plugin framework: per-request hook registry with priority-ordered
//! dispatch, plugin manifest loading, per-route activation rules, and the
//! loader that discovers eligible plugins and lets them register their
//! hooks.
//!
//! Nothing in this crate is process-global. A [`HookRegistry`] and a
//! [`PageContext`] are constructed fresh for every request and dropped
//! when the response is complete; concurrent requests never share either.

pub mod activation;
pub mod context;
pub mod hooks;
pub mod loader;
pub mod manifest;
pub mod traits;

pub use context::{PageContext, SessionHandle};
pub use hooks::registry::{
    ActionHandler, DEFAULT_PRIORITY, FilterHandler, FnAction, FnFilter, HookBinder, HookRegistry,
};
pub use loader::PluginLoader;
pub use manifest::{PluginManifest, RouteRules};
pub use traits::{Plugin, PluginAssets};
