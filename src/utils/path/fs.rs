//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_path` - resolve relative paths with fallback directory
//! - `append_suffix` - append text to a file name, keeping existing dots
//! - `to_slash` - forward-slash rendering for ids and globs

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
///
/// # Example
/// ```ignore
/// use mdxroute::utils::path::normalize_path;
/// let abs = normalize_path(Path::new("./app/routes/index.mdx"));
/// ```
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a path that may be relative to cwd or a fallback directory.
///
/// Always returns an absolute path.
///
/// Tries in order:
/// 1. If absolute, use as-is
/// 2. If exists relative to cwd, normalize to absolute
/// 3. Otherwise, resolve relative to fallback_dir
///
/// # Example
/// ```ignore
/// use mdxroute::utils::path::resolve_path;
/// // User passes "blog/hello.mdx", fallback is the routes root
/// let resolved = resolve_path(Path::new("blog/hello.mdx"), routes_root);
/// ```
#[inline]
pub fn resolve_path(path: &Path, fallback_dir: &Path) -> PathBuf {
    // Absolute path: use as-is
    if path.is_absolute() {
        return path.to_path_buf();
    }

    // Try cwd-relative first (handles `app/routes/blog/hello.mdx`)
    if path.exists() {
        return normalize_path(path);
    }

    // Fall back to fallback_dir-relative (handles `blog/hello.mdx`)
    normalize_path(&fallback_dir.join(path))
}

/// `routes/index.mdx` + `.js` → `routes/index.mdx.js`.
///
/// Unlike `set_extension`, nothing already in the file name is replaced.
pub fn append_suffix(path: &Path, suffix: impl AsRef<OsStr>) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Render a relative path with `/` separators on every platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
