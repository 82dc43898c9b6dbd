//! Project configuration management for `mdxroute.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── routes     # [routes]
//! │   ├── compile    # [compile]
//! │   └── watch      # [watch]
//! ├── error          # ConfigError, diagnostics
//! ├── util           # Config file lookup
//! └── mod.rs         # Config (this file)
//! ```
//!
//! The config file is optional: without one, every default applies and the
//! current directory is the project root.

mod error;
pub mod section;
mod util;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use error::{ConfigDiagnostics, ConfigError, FieldPath};
pub use section::{CompileConfig, RoutesConfig, WatchConfig};
use util::find_config_file;

use crate::cache::CacheStore;
use crate::compiler::{MarkdownOptions, ModuleCompiler, Resolver};
use crate::content::ContentGlob;
use crate::pipeline::RoutePipeline;
use crate::watch::WatchTarget;

/// Default config file name.
pub const CONFIG_FILE: &str = "mdxroute.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `mdxroute.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub routes: RoutesConfig,

    #[serde(default)]
    pub compile: CompileConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration, searching upward from `cwd` for `config_name`.
    ///
    /// A missing file is not an error: defaults apply with `cwd` as root.
    pub fn load(config_name: &Path, cwd: &Path) -> Result<Self, ConfigError> {
        let mut config = match find_config_file(config_name, cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = Some(path);
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", config_name.display());
                Self {
                    root: cwd.to_path_buf(),
                    ..Self::default()
                }
            }
        };

        config.validate()?;
        config.root = crate::utils::path::normalize_path(&config.root);
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        crate::log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Check values that would only fail later, mid-build.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if let Err(e) = glob::Pattern::new(&self.routes.mdx_files) {
            diag.error(
                RoutesConfig::MDX_FILES,
                format!("invalid glob `{}`: {e}", self.routes.mdx_files),
            );
        }

        for pattern in &self.routes.ignored_route_files {
            if let Err(e) = glob::Pattern::new(pattern) {
                diag.error(
                    RoutesConfig::IGNORED_ROUTE_FILES,
                    format!("invalid glob `{pattern}`: {e}"),
                );
            }
        }

        for ext in &self.compile.extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                diag.error_with_hint(
                    CompileConfig::EXTENSIONS,
                    format!("`{ext}` is not an extension"),
                    format!("write it with a leading dot, e.g. `.{}`", ext.trim_start_matches('.')),
                );
            }
        }

        if self.compile.runtime_module.trim().is_empty() {
            diag.error(CompileConfig::RUNTIME_MODULE, "must not be empty");
        }

        diag.into_result()
    }

    // ========================================================================
    // paths
    // ========================================================================

    /// Join a path with the project root.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    pub fn app_dir(&self) -> PathBuf {
        self.root_join(&self.routes.app_dir)
    }

    /// Content root (watched directory).
    pub fn content_root(&self) -> PathBuf {
        self.root_join(&self.routes.root)
    }

    // ========================================================================
    // components
    // ========================================================================

    pub fn content_glob(&self) -> Result<ContentGlob, ConfigError> {
        ContentGlob::new(&self.routes.mdx_files).map_err(|e| {
            let mut diag = ConfigDiagnostics::new();
            diag.error(RoutesConfig::MDX_FILES, e.to_string());
            ConfigError::Diagnostics(diag)
        })
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(&self.compile.alias_prefix, self.compile.extensions.clone())
    }

    pub fn cache_store(&self) -> CacheStore {
        CacheStore::new(&self.root, &self.compile.cache_dir)
    }

    pub fn pipeline(&self) -> RoutePipeline {
        let compiler = ModuleCompiler::new(self.resolver(), MarkdownOptions::all());
        RoutePipeline::new(compiler, self.cache_store(), &self.compile.runtime_module)
    }

    pub fn watch_target(&self, pipeline: Arc<RoutePipeline>) -> Result<WatchTarget, ConfigError> {
        Ok(WatchTarget {
            root: self.content_root(),
            glob: self.content_glob()?,
            pipeline,
            debounce: self.watch.debounce(),
        })
    }
}

/// Parse a config string in tests, panicking on error.
#[cfg(test)]
pub(crate) fn test_parse_config(content: &str) -> Config {
    Config::parse_with_ignored(content).unwrap().0
}
