//! Site-wide configuration.

use serde::{Deserialize, Serialize};

/// Site-wide settings consumed by the lifecycle controller and plugins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public root URL of the site, without a trailing slash.
    /// Used to build redirect targets and plugin asset URLs.
    #[serde(default = "default_root_url")]
    pub root_url: String,
    /// Page identifier served when the view phase produces no output.
    #[serde(default = "default_not_found_route")]
    pub not_found_route: String,
    /// Debug mode: error pages include the error message.
    #[serde(default)]
    pub debug: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            not_found_route: default_not_found_route(),
            debug: false,
        }
    }
}

fn default_root_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_not_found_route() -> String {
    "404".to_string()
}
