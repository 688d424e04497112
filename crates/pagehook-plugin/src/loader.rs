//! Plugin loader: discovers manifests, filters by eligibility, and runs
//! each eligible plugin's registration exactly once.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use pagehook_core::error::AppError;

use crate::activation::route_allowed;
use crate::hooks::registry::{HookBinder, HookRegistry};
use crate::manifest::{self, PluginManifest};
use crate::traits::{Plugin, PluginAssets};

/// Discovers and loads plugins for one request.
///
/// The loader itself is built once at startup and shared; all of its
/// per-request work goes into the caller-supplied [`HookRegistry`].
/// Compiled-in plugins are registered by id; the manifest directory on
/// disk decides which of them load for a given page.
pub struct PluginLoader {
    plugins_dir: PathBuf,
    site_root: String,
    builtins: HashMap<String, Arc<dyn Plugin>>,
}

impl PluginLoader {
    /// Creates a loader over a plugin manifest directory.
    ///
    /// `site_root` is the public root URL (no trailing slash), used to
    /// derive plugin asset URLs.
    pub fn new(plugins_dir: impl Into<PathBuf>, site_root: impl Into<String>) -> Self {
        Self {
            plugins_dir: plugins_dir.into(),
            site_root: site_root.into(),
            builtins: HashMap::new(),
        }
    }

    /// Adds a compiled-in plugin (builder style).
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.register_plugin(plugin);
        self
    }

    /// Adds a compiled-in plugin.
    pub fn register_plugin(&mut self, plugin: Arc<dyn Plugin>) {
        let id = plugin.id().to_string();
        if self.builtins.insert(id.clone(), plugin).is_some() {
            warn!(plugin_id = %id, "Compiled-in plugin id registered twice, replacing");
        }
    }

    /// Number of compiled-in plugins known to the loader.
    pub fn builtin_count(&self) -> usize {
        self.builtins.len()
    }

    /// Discovers, filters, and loads every plugin eligible for `page_id`,
    /// returning how many loaded.
    ///
    /// Two passes, like the source framework: a full eligibility pass
    /// over all manifests first (inactive, code-less, or route-denied
    /// plugins are skipped without error), then each eligible plugin's
    /// `register` runs exactly once, in directory discovery order.
    ///
    /// Zero is not an error here; the caller decides that a plugin-less
    /// request is fatal, because the framework has no intrinsic behavior
    /// without plugins.
    pub async fn load_active(
        &self,
        page_id: &str,
        registry: &mut HookRegistry,
    ) -> Result<usize, AppError> {
        let dirs = manifest::list_plugin_dirs(&self.plugins_dir)?;

        let mut eligible: Vec<(PluginManifest, Arc<dyn Plugin>)> = Vec::new();
        for dir in &dirs {
            let Some(manifest) = manifest::load_manifest(dir, &self.site_root) else {
                continue;
            };

            if !manifest.active {
                debug!(plugin_id = %manifest.id, "Plugin inactive, skipping");
                continue;
            }

            let Some(plugin) = self.builtins.get(&manifest.id) else {
                warn!(
                    plugin_id = %manifest.id,
                    dir = %dir.display(),
                    "Manifest has no compiled-in plugin, skipping"
                );
                continue;
            };

            if !route_allowed(&manifest.routes, page_id) {
                debug!(plugin_id = %manifest.id, page_id, "Plugin not active on this route");
                continue;
            }

            eligible.push((manifest, Arc::clone(plugin)));
        }

        let mut loaded = 0;
        for (manifest, plugin) in eligible {
            let assets = PluginAssets::new(&manifest.base_dir, &manifest.public_base_url);
            let mut binder = HookBinder::new(registry, &manifest.id);
            plugin.register(&mut binder, &assets).await.map_err(|e| {
                AppError::plugin(format!("Plugin '{}' failed to load: {e}", manifest.id))
            })?;
            info!(plugin_id = %manifest.id, page_id, "Plugin loaded");
            loaded += 1;
        }

        Ok(loaded)
    }
}
