//! Conventional file-system route scanning.
//!
//! Every module under `<app>/routes` is a route:
//!
//! | File                        | Id                       | Path          |
//! |-----------------------------|--------------------------|---------------|
//! | `routes/index.tsx`          | `routes/index`           | index route   |
//! | `routes/blog.tsx`           | `routes/blog`            | `blog`        |
//! | `routes/blog/$slug.mdx`     | `routes/blog/$slug`      | `:slug`       |
//! | `routes/docs.intro.mdx`     | `routes/docs.intro`      | `docs/intro`  |
//! | `routes/__auth/login.tsx`   | `routes/__auth/login`    | `login`       |
//! | `routes/$.tsx`              | `routes/$`               | `*`           |
//!
//! A route nests under the longest other route id that is a directory
//! prefix of its own, falling back to `root`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern, PatternError};
use jwalk::WalkDir;
use thiserror::Error;

use super::{RouteEntry, RouteTable};
use crate::utils::path::to_slash;

/// Id of the app root route.
pub const ROOT_ROUTE_ID: &str = "root";

/// Route modules, in lookup order for `root.*`.
const ROUTE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "md", "mdx"];

/// Directory below the app dir holding route modules.
const ROUTES_DIR: &str = "routes";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("app directory `{}` does not exist", .0.display())]
    MissingAppDir(PathBuf),

    #[error("invalid ignored route pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("route `{}` is defined by both `{}` and `{}`", .id, .first.display(), .second.display())]
    Conflict {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Scan `<app_dir>/routes` with the given ignore patterns.
pub fn scan_routes(app_dir: &Path, ignored: &[String]) -> Result<RouteTable, ScanError> {
    RouteScanner::new(app_dir, ignored)?.scan()
}

/// Builds the static route table from the app directory.
#[derive(Debug, Clone)]
pub struct RouteScanner {
    app_dir: PathBuf,
    ignored: Vec<Pattern>,
}

impl RouteScanner {
    pub fn new(app_dir: impl Into<PathBuf>, ignored: &[String]) -> Result<Self, PatternError> {
        let ignored = ignored
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            app_dir: app_dir.into(),
            ignored,
        })
    }

    pub fn scan(&self) -> Result<RouteTable, ScanError> {
        if !self.app_dir.is_dir() {
            return Err(ScanError::MissingAppDir(self.app_dir.clone()));
        }

        let mut table = RouteTable::new();
        let root = self.root_file();
        if let Some(file) = &root {
            table.insert(
                ROOT_ROUTE_ID.to_string(),
                RouteEntry {
                    id: ROOT_ROUTE_ID.to_string(),
                    file: file.clone(),
                    parent_id: None,
                    path: Some(String::new()),
                    index: false,
                },
            );
        }

        let sources = self.route_sources()?;
        for (id, file) in &sources {
            let parent = find_parent(id, &sources);
            let relative = match parent {
                Some(parent) => &id[parent.len() + 1..],
                None => id.strip_prefix("routes/").unwrap_or(id),
            };
            let (path, index) = route_path(relative);

            let parent_id = parent
                .map(str::to_string)
                .or_else(|| root.is_some().then(|| ROOT_ROUTE_ID.to_string()));

            table.insert(
                id.clone(),
                RouteEntry {
                    id: id.clone(),
                    file: file.clone(),
                    parent_id,
                    path,
                    index,
                },
            );
        }

        crate::debug!("routes"; "scanned {} routes in {}", table.len(), self.app_dir.display());
        Ok(table)
    }

    /// `root.<ext>` in the app dir, relative to it.
    fn root_file(&self) -> Option<PathBuf> {
        ROUTE_EXTENSIONS
            .iter()
            .map(|ext| PathBuf::from(format!("{ROOT_ROUTE_ID}.{ext}")))
            .find(|file| self.app_dir.join(file).is_file())
    }

    /// Route id → file (relative to the app dir), for every route module.
    fn route_sources(&self) -> Result<BTreeMap<String, PathBuf>, ScanError> {
        let routes_dir = self.app_dir.join(ROUTES_DIR);
        let mut sources = BTreeMap::new();
        if !routes_dir.is_dir() {
            return Ok(sources);
        }

        let files = WalkDir::new(&routes_dir)
            .sort(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path());

        for path in files {
            let Ok(relative) = path.strip_prefix(&routes_dir) else {
                continue;
            };
            if !is_route_module(relative) || self.is_ignored(relative) {
                continue;
            }

            let id = format!("{ROUTES_DIR}/{}", to_slash(&relative.with_extension("")));
            let file = Path::new(ROUTES_DIR).join(relative);
            if let Some(first) = sources.insert(id.clone(), file.clone()) {
                return Err(ScanError::Conflict {
                    id,
                    first,
                    second: file,
                });
            }
        }
        Ok(sources)
    }

    fn is_ignored(&self, relative: &Path) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        let relative = to_slash(relative);
        self.ignored
            .iter()
            .any(|pattern| pattern.matches_with(&relative, options))
    }
}

fn is_route_module(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ROUTE_EXTENSIONS.contains(&ext))
}

/// Longest other id that is a directory prefix of `id`.
fn find_parent<'a>(id: &str, sources: &'a BTreeMap<String, PathBuf>) -> Option<&'a str> {
    sources
        .keys()
        .filter(|candidate| {
            id.len() > candidate.len()
                && id.starts_with(candidate.as_str())
                && id.as_bytes()[candidate.len()] == b'/'
        })
        .max_by_key(|candidate| candidate.len())
        .map(String::as_str)
}

/// URL path and index flag for the id segments below the parent.
fn route_path(relative: &str) -> (Option<String>, bool) {
    let segments: Vec<&str> = relative.split('/').collect();
    let mut parts = Vec::new();
    let mut index = false;

    for (i, segment) in segments.iter().enumerate() {
        if i + 1 == segments.len() && *segment == "index" {
            index = true;
            continue;
        }
        // Pathless layout
        if segment.starts_with("__") {
            continue;
        }
        for piece in segment.split('.') {
            match piece {
                "$" => parts.push("*".to_string()),
                _ => match piece.strip_prefix('$') {
                    Some(param) => parts.push(format!(":{param}")),
                    None => parts.push(piece.to_string()),
                },
            }
        }
    }

    let path = parts.join("/");
    ((!path.is_empty()).then_some(path), index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn app(files: &[&str]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for file in files {
            let path = temp.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        temp
    }

    fn default_ignored() -> Vec<String> {
        [".*", "**/*.css", "**/*.test.*"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_scan_flat_routes() {
        let temp = app(&["root.tsx", "routes/index.tsx", "routes/about.mdx"]);
        let table = scan_routes(temp.path(), &default_ignored()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table["root"].file, PathBuf::from("root.tsx"));

        let index = &table["routes/index"];
        assert_eq!(index.file, PathBuf::from("routes/index.tsx"));
        assert_eq!(index.parent_id.as_deref(), Some("root"));
        assert_eq!(index.path, None);
        assert!(index.index);

        let about = &table["routes/about"];
        assert_eq!(about.path.as_deref(), Some("about"));
        assert!(!about.index);
    }

    #[test]
    fn test_nested_layout_parent() {
        let temp = app(&[
            "root.tsx",
            "routes/blog.tsx",
            "routes/blog/index.mdx",
            "routes/blog/$slug.mdx",
        ]);
        let table = scan_routes(temp.path(), &default_ignored()).unwrap();

        let slug = &table["routes/blog/$slug"];
        assert_eq!(slug.parent_id.as_deref(), Some("routes/blog"));
        assert_eq!(slug.path.as_deref(), Some(":slug"));

        let index = &table["routes/blog/index"];
        assert_eq!(index.parent_id.as_deref(), Some("routes/blog"));
        assert!(index.index);
    }

    #[test]
    fn test_directory_without_layout_uses_root() {
        let temp = app(&["root.tsx", "routes/docs/intro.mdx"]);
        let table = scan_routes(temp.path(), &default_ignored()).unwrap();

        let intro = &table["routes/docs/intro"];
        assert_eq!(intro.parent_id.as_deref(), Some("root"));
        assert_eq!(intro.path.as_deref(), Some("docs/intro"));
    }

    #[test]
    fn test_ignored_files_skipped() {
        let temp = app(&[
            "routes/index.tsx",
            "routes/.draft.mdx",
            "routes/style.css",
            "routes/blog/post.test.tsx",
            "routes/notes.txt",
        ]);
        let table = scan_routes(temp.path(), &default_ignored()).unwrap();
        let ids: Vec<_> = table.keys().map(String::as_str).collect();
        assert_eq!(ids, ["routes/index"]);
    }

    #[test]
    fn test_no_root_means_no_parent() {
        let temp = app(&["routes/index.tsx"]);
        let table = scan_routes(temp.path(), &[]).unwrap();
        assert_eq!(table["routes/index"].parent_id, None);
    }

    #[test]
    fn test_conflicting_ids() {
        let temp = app(&["routes/index.tsx", "routes/index.mdx"]);
        let err = scan_routes(temp.path(), &[]).unwrap_err();
        assert!(matches!(err, ScanError::Conflict { id, .. } if id == "routes/index"));
    }

    #[test]
    fn test_missing_app_dir() {
        let temp = TempDir::new().unwrap();
        let err = scan_routes(&temp.path().join("app"), &[]).unwrap_err();
        assert!(matches!(err, ScanError::MissingAppDir(_)));
    }

    #[test]
    fn test_route_path_conventions() {
        assert_eq!(route_path("index"), (None, true));
        assert_eq!(route_path("docs.intro"), (Some("docs/intro".into()), false));
        assert_eq!(route_path("$"), (Some("*".into()), false));
        assert_eq!(route_path("__auth/login"), (Some("login".into()), false));
        assert_eq!(route_path("users/$id/index"), (Some("users/:id".into()), true));
    }
}
