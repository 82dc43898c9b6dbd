//! `[compile]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [compile]
//! cache_dir = ".cache/mdx-routes"           # Compiled modules + markers
//! alias_prefix = "~"                        # Imports left untouched
//! extensions = [".js", ".jsx", ".ts", ".tsx", ".mdx"]
//! runtime_module = "@remix-run/node"        # Source of `json`
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_DIR;
use crate::compiler::DEFAULT_EXTENSIONS;
use crate::config::FieldPath;

/// Module compilation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Cache directory, relative to the project root.
    pub cache_dir: PathBuf,

    /// Import prefix owned by the framework's own resolver.
    pub alias_prefix: String,

    /// Extension resolution order for extensionless imports.
    pub extensions: Vec<String>,

    /// Server runtime module providing `json`.
    pub runtime_module: String,
}

impl CompileConfig {
    pub const EXTENSIONS: FieldPath = FieldPath::new("compile.extensions");
    pub const RUNTIME_MODULE: FieldPath = FieldPath::new("compile.runtime_module");
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            alias_prefix: "~".to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            runtime_module: "@remix-run/node".to_string(),
        }
    }
}
