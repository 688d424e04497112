//! Plugin manifest discovery and parsing.
//!
//! Every plugin directory carries a `plugin.json` descriptor. Manifests
//! that are missing, unparseable, or lack an `id` are skipped with a log
//! line; a broken plugin never fails the request.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pagehook_core::error::AppError;

/// Descriptor file name inside each plugin directory.
pub const MANIFEST_FILE: &str = "plugin.json";

/// Route allow/deny lists declared by a manifest.
///
/// Evaluated by [`crate::activation::route_allowed`]: deny wins, the
/// literal `"all"` as the first allow entry matches every page, and a
/// manifest with neither list is never loaded (default-deny).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteRules {
    /// Page identifiers the plugin runs on, or `["all"]`.
    #[serde(default)]
    pub on: Vec<String>,
    /// Page identifiers the plugin must never run on.
    #[serde(default)]
    pub off: Vec<String>,
}

/// On-disk manifest shape. Parsing rejects a missing `id` outright.
#[derive(Debug, Deserialize)]
struct RawManifest {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    routes: RouteRules,
}

/// A validated plugin manifest, enriched with derived location fields.
///
/// Immutable after parse; one instance per plugin directory per request.
#[derive(Debug, Clone)]
pub struct PluginManifest {
    /// Unique plugin identifier; must match a compiled-in plugin.
    pub id: String,
    /// Human-readable plugin name.
    pub name: String,
    /// Version string, if declared.
    pub version: Option<String>,
    /// Description, if declared.
    pub description: Option<String>,
    /// Whether the plugin is switched on at all.
    pub active: bool,
    /// Per-route activation rules.
    pub routes: RouteRules,
    /// Name of the plugin directory.
    pub dir_name: String,
    /// Absolute path of the plugin directory.
    pub base_dir: PathBuf,
    /// Public URL under which the plugin's static assets are served.
    pub public_base_url: String,
}

/// Lists plugin directories under `root`, sorted by name.
///
/// `read_dir` order is platform-defined, so entries are sorted to keep
/// discovery (and therefore hook registration) order stable. Non-directory
/// entries are ignored.
pub fn list_plugin_dirs(root: &Path) -> Result<Vec<PathBuf>, AppError> {
    let entries = fs::read_dir(root).map_err(|e| {
        AppError::configuration(format!(
            "Plugin directory '{}' is not readable: {e}",
            root.display()
        ))
    })?;

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();
    dirs.sort();

    Ok(dirs)
}

/// Parses the manifest in `dir`, or `None` when the plugin should be
/// skipped.
///
/// `site_root` (no trailing slash) is used to derive the public asset
/// URL. All failure modes are logged and mapped to `None`: this is the
/// "manifest error" class, which never aborts a request.
pub fn load_manifest(dir: &Path, site_root: &str) -> Option<PluginManifest> {
    let manifest_path = dir.join(MANIFEST_FILE);

    let contents = match fs::read_to_string(&manifest_path) {
        Ok(c) => c,
        Err(_) => {
            debug!(path = %manifest_path.display(), "No plugin manifest");
            return None;
        }
    };

    let raw: RawManifest = match serde_json::from_str(&contents) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %manifest_path.display(), error = %e, "Invalid plugin manifest, skipping");
            return None;
        }
    };

    if raw.id.trim().is_empty() {
        warn!(path = %manifest_path.display(), "Plugin manifest has an empty id, skipping");
        return None;
    }

    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base_dir = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
    let public_base_url = format!(
        "{}/plugins/{}/",
        site_root.trim_end_matches('/'),
        dir_name
    );

    Some(PluginManifest {
        name: raw.name.unwrap_or_else(|| raw.id.clone()),
        id: raw.id,
        version: raw.version,
        description: raw.description,
        active: raw.active,
        routes: raw.routes,
        dir_name,
        base_dir,
        public_base_url,
    })
}
