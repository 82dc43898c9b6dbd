//! Import specifier resolution.
//!
//! Node-style lookup, limited to what generated route modules need:
//!
//! - `./x`, `../x`: file as-is, then `x<ext>` for each extension in order,
//!   then directory (`package.json#main`, `index<ext>`)
//! - bare `pkg/sub`: the same lookup under each `node_modules` from the
//!   importing directory upward
//!
//! Absolute paths and alias-prefixed specifiers (`~/components/nav`) are
//! never touched.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::ResolveError;
use crate::utils::path::{append_suffix, normalize_path};

/// Default extension resolution order.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx", ".mdx"];

/// Resolves import specifiers to absolute paths.
#[derive(Debug, Clone)]
pub struct Resolver {
    alias_prefix: String,
    extensions: Vec<String>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new("~", DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect())
    }
}

impl Resolver {
    pub fn new(alias_prefix: impl Into<String>, extensions: Vec<String>) -> Self {
        Self {
            alias_prefix: alias_prefix.into(),
            extensions,
        }
    }

    /// Resolve `specifier` imported from a module in `basedir`.
    ///
    /// Returns `Ok(None)` when the specifier must stay as written: absolute,
    /// aliased, or a bare package that is not installed locally.
    pub fn resolve(&self, specifier: &str, basedir: &Path) -> Result<Option<PathBuf>, ResolveError> {
        if self.is_pinned(specifier) {
            return Ok(None);
        }

        if is_relative(specifier) {
            return self
                .resolve_path(&basedir.join(specifier))
                .map(|path| Some(normalize_path(&path)))
                .ok_or_else(|| ResolveError::new(specifier, basedir));
        }

        let resolved = self.resolve_package(specifier, basedir);
        if resolved.is_none() {
            crate::debug!("resolve"; "package `{}` not installed under {}, kept as written", specifier, basedir.display());
        }
        Ok(resolved.map(|path| normalize_path(&path)))
    }

    /// Absolute or alias-prefixed specifiers are left alone.
    fn is_pinned(&self, specifier: &str) -> bool {
        Path::new(specifier).is_absolute()
            || (!self.alias_prefix.is_empty() && specifier.starts_with(&self.alias_prefix))
    }

    fn resolve_path(&self, candidate: &Path) -> Option<PathBuf> {
        self.as_file(candidate)
            .or_else(|| self.as_directory(candidate))
    }

    fn as_file(&self, candidate: &Path) -> Option<PathBuf> {
        if candidate.is_file() {
            return Some(candidate.to_path_buf());
        }
        self.extensions
            .iter()
            .map(|ext| append_suffix(candidate, ext))
            .find(|path| path.is_file())
    }

    fn as_directory(&self, dir: &Path) -> Option<PathBuf> {
        if !dir.is_dir() {
            return None;
        }

        if let Some(main) = package_main(dir) {
            let entry = dir.join(main);
            if let Some(path) = self.as_file(&entry).or_else(|| self.index_of(&entry)) {
                return Some(path);
            }
        }

        self.index_of(dir)
    }

    fn index_of(&self, dir: &Path) -> Option<PathBuf> {
        self.extensions
            .iter()
            .map(|ext| dir.join(format!("index{ext}")))
            .find(|path| path.is_file())
    }

    fn resolve_package(&self, specifier: &str, basedir: &Path) -> Option<PathBuf> {
        basedir
            .ancestors()
            .map(|dir| dir.join("node_modules").join(specifier))
            .find_map(|candidate| self.resolve_path(&candidate))
    }
}

fn is_relative(specifier: &str) -> bool {
    matches!(specifier, "." | "..") || specifier.starts_with("./") || specifier.starts_with("../")
}

/// `main` field of `dir/package.json`, if any.
fn package_main(dir: &Path) -> Option<String> {
    let content = fs::read_to_string(dir.join("package.json")).ok()?;
    let manifest: serde_json::Value = serde_json::from_str(&content).ok()?;
    manifest.get("main")?.as_str().map(str::to_string)
}
