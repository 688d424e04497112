//! Plugin system configuration.

use serde::{Deserialize, Serialize};

/// Plugin system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Directory containing plugin manifest directories.
    #[serde(default = "default_plugin_directory")]
    pub directory: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            directory: default_plugin_directory(),
        }
    }
}

fn default_plugin_directory() -> String {
    "plugins".to_string()
}
