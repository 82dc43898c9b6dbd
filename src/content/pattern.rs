//! Content file matching.

use std::path::Path;

use glob::{MatchOptions, Pattern, PatternError};

use crate::utils::path::to_slash;

/// Extension assumed when the glob does not end in a literal one.
const DEFAULT_EXTENSION: &str = "mdx";

/// Glob selecting content files below the content root (e.g. `**/*.mdx`).
#[derive(Debug, Clone)]
pub struct ContentGlob {
    pattern: Pattern,
    extension: String,
}

impl ContentGlob {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let extension = literal_extension(pattern).unwrap_or(DEFAULT_EXTENSION).to_string();
        Ok(Self {
            pattern: Pattern::new(pattern)?,
            extension,
        })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Content extension, without the dot (`mdx`).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Whether a route file carries the content extension.
    pub fn has_extension(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == self.extension.as_str())
    }

    /// Whether `path` (relative to the content root) matches the glob.
    pub fn matches(&self, relative: &Path) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.pattern.matches_with(&to_slash(relative), options)
    }

    /// Whether `path` is a content file under `root`.
    pub fn is_content_file(&self, root: &Path, path: &Path) -> bool {
        path.strip_prefix(root)
            .is_ok_and(|relative| self.matches(relative))
    }
}

/// `**/*.mdx` → `mdx`; `None` when the last segment's extension is not literal.
fn literal_extension(pattern: &str) -> Option<&str> {
    let last = pattern.rsplit('/').next()?;
    let (_, ext) = last.rsplit_once('.')?;
    let literal = !ext.is_empty() && !ext.contains(['*', '?', '[', ']', '{', '}']);
    literal.then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_glob() {
        let glob = ContentGlob::new("**/*.mdx").unwrap();
        assert_eq!(glob.extension(), "mdx");
        assert!(glob.matches(Path::new("index.mdx")));
        assert!(glob.matches(Path::new("blog/2024/post.mdx")));
        assert!(!glob.matches(Path::new("blog/post.md")));
        assert!(!glob.matches(Path::new("index.mdx.js")));
    }

    #[test]
    fn test_is_content_file_relative_to_root() {
        let glob = ContentGlob::new("blog/*.mdx").unwrap();
        let root = PathBuf::from("/project/app/routes");

        assert!(glob.is_content_file(&root, &root.join("blog/post.mdx")));
        assert!(!glob.is_content_file(&root, &root.join("docs/post.mdx")));
        assert!(!glob.is_content_file(&root, Path::new("/elsewhere/blog/post.mdx")));
    }

    #[test]
    fn test_has_extension() {
        let glob = ContentGlob::new("**/*.md").unwrap();
        assert!(glob.has_extension(Path::new("routes/readme.md")));
        assert!(!glob.has_extension(Path::new("routes/readme.mdx")));
    }

    #[test]
    fn test_non_literal_extension_falls_back() {
        let glob = ContentGlob::new("**/*.md?").unwrap();
        assert_eq!(glob.extension(), DEFAULT_EXTENSION);
    }

    #[test]
    fn test_invalid_glob() {
        assert!(ContentGlob::new("[").is_err());
    }
}
