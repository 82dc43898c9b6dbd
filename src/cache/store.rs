//! On-disk cache store.

use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use tokio::fs;

use super::hash::{ContentHash, is_short_hex};
use crate::utils::path::append_suffix;

/// Failure writing a compiled module or its marker.
#[derive(Debug, Error)]
#[error("failed to write cache entry `{}`: {}", .path.display(), .source)]
pub struct CacheWriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl CacheWriteError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Content-addressed store of compiled modules.
///
/// Sole owner of the files under its root. No locking: concurrent writers
/// of the same source race on plain file writes, and the marker is always
/// written last.
#[derive(Debug, Clone)]
pub struct CacheStore {
    project_root: PathBuf,
    root: PathBuf,
}

impl CacheStore {
    /// Store rooted at `project_root/cache_dir` (an absolute `cache_dir` is used as-is).
    pub fn new(project_root: impl Into<PathBuf>, cache_dir: impl AsRef<Path>) -> Self {
        let project_root = project_root.into();
        let root = project_root.join(cache_dir);
        Self { project_root, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Mirror of `source` under the cache root (no suffix).
    ///
    /// Sources outside the project root are mirrored by their full path.
    pub fn mirror(&self, source: &Path) -> PathBuf {
        let relative = source.strip_prefix(&self.project_root).unwrap_or(source);
        let normal: PathBuf = relative
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        self.root.join(normal)
    }

    /// `<cache>/<rel>.js`
    pub fn module_path(&self, source: &Path) -> PathBuf {
        append_suffix(&self.mirror(source), ".js")
    }

    /// `<cache>/<rel>-<8 hex>`
    pub fn marker_path(&self, source: &Path, hash: ContentHash) -> PathBuf {
        append_suffix(&self.mirror(source), format!("-{}", hash.short()))
    }

    /// Whether a module for exactly this content is cached.
    pub async fn has(&self, source: &Path, hash: ContentHash) -> bool {
        fs::try_exists(self.marker_path(source, hash))
            .await
            .unwrap_or(false)
    }

    /// Path of the compiled module for `source` (may not exist yet).
    pub fn get(&self, source: &Path) -> PathBuf {
        self.module_path(source)
    }

    /// Write `module_text` for `source` at `hash`.
    ///
    /// Order: parents, stale markers removed, module, marker.
    pub async fn put(
        &self,
        source: &Path,
        hash: ContentHash,
        module_text: &str,
    ) -> Result<PathBuf, CacheWriteError> {
        let module_path = self.module_path(source);
        let marker_path = self.marker_path(source, hash);

        if let Some(parent) = module_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheWriteError::new(parent, e))?;
        }

        self.remove_stale_markers(source, hash).await?;

        fs::write(&module_path, module_text)
            .await
            .map_err(|e| CacheWriteError::new(&module_path, e))?;

        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        fs::write(&marker_path, stamp)
            .await
            .map_err(|e| CacheWriteError::new(&marker_path, e))?;

        crate::debug!("cache"; "stored {} ({})", module_path.display(), hash);
        Ok(module_path)
    }

    /// Remove the whole cache directory. Missing directory is not an error.
    pub async fn clear(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.root).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Delete markers of other content versions of `source`.
    async fn remove_stale_markers(&self, source: &Path, hash: ContentHash) -> Result<(), CacheWriteError> {
        let mirror = self.mirror(source);
        let (Some(dir), Some(name)) = (mirror.parent(), mirror.file_name()) else {
            return Ok(());
        };
        let prefix = format!("{}-", name.to_string_lossy());
        let current = hash.short();

        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| CacheWriteError::new(dir, e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheWriteError::new(dir, e))?
        {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let Some(suffix) = file_name.strip_prefix(&prefix) else {
                continue;
            };
            if is_short_hex(suffix) && suffix != current {
                let path = entry.path();
                match fs::remove_file(&path).await {
                    Err(e) if e.kind() != io::ErrorKind::NotFound => {
                        return Err(CacheWriteError::new(&path, e));
                    }
                    _ => crate::debug!("cache"; "removed stale marker {}", path.display()),
                }
            }
        }
        Ok(())
    }
}
