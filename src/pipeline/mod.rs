//! Content route pipeline.
//!
//! One content file in, one cached route module out:
//!
//! ```text
//! read ─► hash ─► marker exists? ──yes──► cached module path
//!                    │
//!                    no
//!                    ▼
//!         parse ─► compile ─► rewrite imports ─► synthesize ─► put
//! ```
//!
//! Both the startup route merge and the watcher go through
//! [`RoutePipeline::compile`], so they share the cache.

mod error;

use std::path::{Path, PathBuf};

use crate::cache::{CacheStore, ContentHash};
use crate::compiler::{ModuleCompiler, synthesize};
use crate::content::parse_document;
use crate::utils::path::normalize_path;

pub use error::PipelineError;

/// Result of compiling one content file.
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    /// Absolute path of the content file.
    pub source_path: PathBuf,
    /// Hash of the source bytes.
    pub hash: ContentHash,
    /// Where the module lives in the cache.
    pub cache_path: PathBuf,
    /// Marker proving `cache_path` matches `hash`.
    pub marker_path: PathBuf,
    /// Module text, present only when freshly generated.
    pub module_text: Option<String>,
}

impl CompiledArtifact {
    /// Served from the cache without recompiling.
    pub fn is_cached(&self) -> bool {
        self.module_text.is_none()
    }
}

/// Cached MDX → route module compilation.
#[derive(Debug, Clone)]
pub struct RoutePipeline {
    compiler: ModuleCompiler,
    store: CacheStore,
    runtime_module: String,
}

impl RoutePipeline {
    pub fn new(compiler: ModuleCompiler, store: CacheStore, runtime_module: impl Into<String>) -> Self {
        Self {
            compiler,
            store,
            runtime_module: runtime_module.into(),
        }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Compile `source` unless a module for its current content is cached.
    pub async fn compile(&self, source: &Path) -> Result<CompiledArtifact, PipelineError> {
        let source_path = normalize_path(source);
        let content = tokio::fs::read_to_string(&source_path)
            .await
            .map_err(|e| PipelineError::Read(source_path.clone(), e))?;
        let hash = ContentHash::of(&content);

        let cache_path = self.store.get(&source_path);
        let marker_path = self.store.marker_path(&source_path, hash);

        if self.store.has(&source_path, hash).await {
            crate::debug!("cache"; "hit {} ({})", source_path.display(), hash);
            return Ok(CompiledArtifact {
                source_path,
                hash,
                cache_path,
                marker_path,
                module_text: None,
            });
        }

        let module_text = self.generate(&content, &source_path)?;
        self.store.put(&source_path, hash, &module_text).await?;

        Ok(CompiledArtifact {
            source_path,
            hash,
            cache_path,
            marker_path,
            module_text: Some(module_text),
        })
    }

    /// Full module text for `content`, without touching the cache.
    pub fn generate(&self, content: &str, source_path: &Path) -> Result<String, PipelineError> {
        let document = parse_document(content)?;
        let compiled = self.compiler.compile(&document, source_path)?;
        Ok(synthesize(&document.metadata, &compiled, &self.runtime_module))
    }
}
