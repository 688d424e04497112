//! The plugin trait and the per-plugin asset resolver.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use pagehook_core::error::AppError;

use crate::hooks::registry::HookBinder;

/// File-path and URL resolution scoped to one plugin's directory.
///
/// Handed to the plugin at load time, derived from its manifest. This is
/// the replacement for the original framework's habit of inferring a
/// plugin's directory from the call stack: the locations are injected
/// instead.
#[derive(Debug, Clone)]
pub struct PluginAssets {
    base_dir: PathBuf,
    public_base_url: String,
}

impl PluginAssets {
    /// Creates a resolver over the plugin's directory and public URL
    /// prefix.
    pub fn new(base_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// The plugin's directory on disk.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// A file path inside the plugin's directory.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.base_dir.join(relative)
    }

    /// The public URL of an asset inside the plugin's directory.
    pub fn url(&self, relative: &str) -> String {
        format!(
            "{}{}",
            self.public_base_url,
            relative.trim_start_matches('/')
        )
    }
}

/// A compiled-in plugin.
///
/// The manifest on disk decides *whether* a plugin loads for a request;
/// this trait is *what* loads. [`register`](Self::register) runs exactly
/// once per request for each eligible plugin, and its whole job is to
/// register hook handlers through the binder. Everything else the plugin
/// does happens inside those handlers during the lifecycle phases.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique identifier; must match the manifest's `id`.
    fn id(&self) -> &str;

    /// Registers this plugin's hooks for the current request.
    async fn register(
        &self,
        hooks: &mut HookBinder<'_>,
        assets: &PluginAssets,
    ) -> Result<(), AppError>;
}
