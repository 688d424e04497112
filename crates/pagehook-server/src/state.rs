//! Application state shared across all requests.

use std::sync::Arc;

use pagehook_core::config::AppConfig;
use pagehook_core::traits::{RowStore, SessionStore};
use pagehook_plugin::PluginLoader;

/// Shared dependencies, passed to the page handler via `State`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks. The
/// hook registry is deliberately absent: one is built per request.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Session storage backend.
    pub sessions: Arc<dyn SessionStore>,
    /// Row storage backend.
    pub rows: Arc<dyn RowStore>,
    /// Plugin discovery and activation.
    pub loader: Arc<PluginLoader>,
}
