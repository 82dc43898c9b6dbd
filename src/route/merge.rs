//! Replace content-backed routes with their compiled modules.

use std::path::{Path, PathBuf};

use super::{RouteEntry, RouteTable};
use crate::cache::CacheStore;
use crate::content::ContentGlob;
use crate::pipeline::{PipelineError, RoutePipeline};
use crate::utils::path::to_slash;

/// A content route that could not be compiled (left in the table as-is).
#[derive(Debug)]
pub struct RouteFailure {
    pub id: String,
    pub source: PathBuf,
    pub error: PipelineError,
}

/// Outcome of one merge pass.
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Routes compiled from scratch.
    pub compiled: usize,
    /// Routes served from the cache.
    pub cached: usize,
    pub failures: Vec<RouteFailure>,
}

impl MergeReport {
    pub fn replaced(&self) -> usize {
        self.compiled + self.cached
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compile every content route in `table` and swap in the cached module.
///
/// Content routes are snapshotted up front, so each original is replaced
/// exactly once even when a derived id sorts later in the table. Route files
/// are resolved against `app_dir`.
pub async fn merge_content_routes(
    table: &mut RouteTable,
    app_dir: &Path,
    glob: &ContentGlob,
    pipeline: &RoutePipeline,
) -> MergeReport {
    let content_ids: Vec<String> = table
        .values()
        .filter(|entry| glob.has_extension(&entry.file))
        .map(|entry| entry.id.clone())
        .collect();

    let mut report = MergeReport::default();
    for id in content_ids {
        let Some(entry) = table.get(&id).cloned() else {
            continue;
        };
        let source = app_dir.join(&entry.file);

        let artifact = match pipeline.compile(&source).await {
            Ok(artifact) => artifact,
            Err(error) => {
                crate::debug!("routes"; "failed {}: {}", id, error);
                report.failures.push(RouteFailure { id, source, error });
                continue;
            }
        };

        if artifact.is_cached() {
            report.cached += 1;
        } else {
            report.compiled += 1;
        }

        let new_id = derive_id(pipeline.store(), app_dir, &artifact.cache_path, glob.extension())
            .unwrap_or_else(|| id.clone());
        crate::debug!("routes"; "{} -> {}", id, new_id);

        table.remove(&id);
        table.insert(
            new_id.clone(),
            RouteEntry {
                id: new_id.clone(),
                file: artifact.cache_path,
                ..entry
            },
        );

        if new_id != id {
            reparent(table, &id, &new_id);
        }
    }

    report
}

/// `<cache>/app/routes/blog/post.mdx.js` → `routes/blog/post`.
fn derive_id(store: &CacheStore, app_dir: &Path, cache_path: &Path, extension: &str) -> Option<String> {
    let mirrored_app = store.mirror(app_dir);
    let relative = to_slash(cache_path.strip_prefix(&mirrored_app).ok()?);
    relative
        .strip_suffix(&format!(".{extension}.js"))
        .map(str::to_string)
}

fn reparent(table: &mut RouteTable, old_id: &str, new_id: &str) {
    for entry in table.values_mut() {
        if entry.parent_id.as_deref() == Some(old_id) {
            entry.parent_id = Some(new_id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::compiler::ModuleCompiler;
    use crate::route::scan_routes;
    use crate::utils::path::normalize_path;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        root: PathBuf,
        pipeline: RoutePipeline,
        glob: ContentGlob,
    }

    fn fixture(files: &[(&str, &str)]) -> Fixture {
        let temp = TempDir::new().unwrap();
        let root = normalize_path(temp.path());
        for (file, content) in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        let store = CacheStore::new(&root, ".cache/mdx-routes");
        Fixture {
            _temp: temp,
            pipeline: RoutePipeline::new(ModuleCompiler::default(), store, "@remix-run/node"),
            glob: ContentGlob::new("**/*.mdx").unwrap(),
            root,
        }
    }

    impl Fixture {
        fn app_dir(&self) -> PathBuf {
            self.root.join("app")
        }

        async fn merge(&self) -> (RouteTable, MergeReport) {
            let mut table = scan_routes(&self.app_dir(), &[]).unwrap();
            let report =
                merge_content_routes(&mut table, &self.app_dir(), &self.glob, &self.pipeline).await;
            (table, report)
        }
    }

    #[tokio::test]
    async fn test_content_routes_replaced() {
        let fx = fixture(&[
            ("app/root.tsx", ""),
            ("app/routes/index.mdx", "# Home\n"),
            ("app/routes/blog/post.mdx", "# Post\n"),
            ("app/routes/about.tsx", ""),
        ]);
        let (table, report) = fx.merge().await;

        assert!(report.is_success());
        assert_eq!(report.compiled, 2);
        assert_eq!(table.len(), 4);
        assert!(table.values().all(|e| e.file.extension().unwrap() != "mdx"));

        let index = &table["routes/index"];
        assert_eq!(
            index.file,
            fx.root.join(".cache/mdx-routes/app/routes/index.mdx.js")
        );
        assert!(index.file.is_file());
        assert!(index.index);
        assert_eq!(index.parent_id.as_deref(), Some("root"));

        let post = &table["routes/blog/post"];
        assert_eq!(post.path.as_deref(), Some("blog/post"));
        assert_eq!(table["routes/about"].file, PathBuf::from("routes/about.tsx"));
    }

    #[tokio::test]
    async fn test_second_merge_uses_cache() {
        let fx = fixture(&[("app/routes/index.mdx", "# Home\n")]);
        let (first, _) = fx.merge().await;
        let (second, report) = fx.merge().await;

        assert_eq!(report.compiled, 0);
        assert_eq!(report.cached, 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failure_isolated() {
        let fx = fixture(&[
            ("app/routes/good.mdx", "# Good\n"),
            ("app/routes/bad.mdx", "import X from \"./nope\";\n\n<X />\n"),
        ]);
        let (table, report) = fx.merge().await;

        assert!(!report.is_success());
        assert_eq!(report.replaced(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].id, "routes/bad");
        assert!(matches!(report.failures[0].error, PipelineError::Resolution(_)));

        // Failing entry untouched
        assert_eq!(table["routes/bad"].file, PathBuf::from("routes/bad.mdx"));
        assert!(table["routes/good"].file.ends_with("good.mdx.js"));
    }

    #[tokio::test]
    async fn test_children_keep_layout_parent() {
        let fx = fixture(&[
            ("app/routes/docs.mdx", "# Docs\n"),
            ("app/routes/docs/intro.mdx", "# Intro\n"),
        ]);
        let (table, _) = fx.merge().await;
        assert_eq!(table["routes/docs/intro"].parent_id.as_deref(), Some("routes/docs"));
    }

    #[test]
    fn test_reparent_on_id_change() {
        let mut table = RouteTable::new();
        for (id, parent) in [("old", None), ("child", Some("old"))] {
            table.insert(
                id.to_string(),
                RouteEntry {
                    id: id.to_string(),
                    file: PathBuf::from(format!("{id}.tsx")),
                    parent_id: parent.map(str::to_string),
                    path: None,
                    index: false,
                },
            );
        }

        reparent(&mut table, "old", "new");
        assert_eq!(table["child"].parent_id.as_deref(), Some("new"));
    }

    #[test]
    fn test_derive_id() {
        let store = CacheStore::new("/project", ".cache/mdx-routes");
        let app = Path::new("/project/app");
        let cache_path = Path::new("/project/.cache/mdx-routes/app/routes/blog/$slug.mdx.js");

        assert_eq!(
            derive_id(&store, app, cache_path, "mdx").as_deref(),
            Some("routes/blog/$slug")
        );
        assert_eq!(derive_id(&store, app, Path::new("/elsewhere/x.mdx.js"), "mdx"), None);
    }
}
