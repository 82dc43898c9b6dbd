//! `[routes]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [routes]
//! app_dir = "app"                   # Framework app directory
//! root = "app/routes"               # Content root (watched)
//! mdx_files = "**/*.mdx"            # Content glob, relative to `root`
//! ignored_route_files = [".*", "**/*.css", "**/*.test.*"]
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::FieldPath;

/// Route discovery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// App directory; route files are relative to it.
    pub app_dir: PathBuf,

    /// Content root, watched for changes.
    pub root: PathBuf,

    /// Glob selecting content files below `root`.
    pub mdx_files: String,

    /// Files under `<app_dir>/routes` that are not routes.
    pub ignored_route_files: Vec<String>,
}

impl RoutesConfig {
    pub const MDX_FILES: FieldPath = FieldPath::new("routes.mdx_files");
    pub const IGNORED_ROUTE_FILES: FieldPath = FieldPath::new("routes.ignored_route_files");
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            app_dir: PathBuf::from("app"),
            root: PathBuf::from("app/routes"),
            mdx_files: "**/*.mdx".to_string(),
            ignored_route_files: vec![
                ".*".to_string(),
                "**/*.css".to_string(),
                "**/*.test.*".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::test_parse_config;

    #[test]
    fn test_routes_config() {
        let config = test_parse_config(
            "[routes]\napp_dir = \"src\"\nroot = \"src/content\"\nmdx_files = \"docs/**/*.mdx\"",
        );

        assert_eq!(config.routes.app_dir, PathBuf::from("src"));
        assert_eq!(config.routes.root, PathBuf::from("src/content"));
        assert_eq!(config.routes.mdx_files, "docs/**/*.mdx");
        // Unset fields keep defaults
        assert_eq!(config.routes.ignored_route_files.len(), 3);
    }

    #[test]
    fn test_routes_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.routes.app_dir, PathBuf::from("app"));
        assert_eq!(config.routes.root, PathBuf::from("app/routes"));
        assert_eq!(config.routes.mdx_files, "**/*.mdx");
        assert_eq!(
            config.routes.ignored_route_files,
            [".*", "**/*.css", "**/*.test.*"]
        );
    }
}
