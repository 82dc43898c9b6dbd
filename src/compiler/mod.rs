//! Module compiler: MDX document → route module text.
//!
//! Two stages over the body of a parsed document:
//!
//! 1. [`body`]: markdown + JSX + ESM → JSX module with a default component
//! 2. [`imports`]: parse the module, pin relative imports to absolute paths
//!
//! The metadata block never reaches the markdown parser: only
//! [`ParsedDocument::body`] is compiled.
//!
//! [`synth`] then wraps the result with the generated `meta`/`loader`.

mod body;
mod error;
mod imports;
mod resolve;
mod synth;

use std::path::Path;

use body::compile_body;
use imports::rewrite_module;

use crate::content::ParsedDocument;

pub use body::MarkdownOptions;
pub use error::{CompileError, ModuleError, ResolveError};
pub use resolve::{DEFAULT_EXTENSIONS, Resolver};
pub use synth::synthesize;

pub(crate) use body::js_string;

/// Compiles content documents into component modules.
#[derive(Debug, Clone, Default)]
pub struct ModuleCompiler {
    resolver: Resolver,
    markdown: MarkdownOptions,
}

impl ModuleCompiler {
    pub fn new(resolver: Resolver, markdown: MarkdownOptions) -> Self {
        Self { resolver, markdown }
    }

    /// Compile the body of `document`, read from `source_path`.
    ///
    /// Imports are resolved against the directory of `source_path`, which
    /// must be absolute for the rewritten specifiers to be absolute.
    pub fn compile(&self, document: &ParsedDocument, source_path: &Path) -> Result<String, ModuleError> {
        let module = compile_body(&document.body, &self.markdown);
        let basedir = source_path.parent().unwrap_or(Path::new("."));
        rewrite_module(&module, &self.resolver, basedir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_document;
    use crate::utils::path::normalize_path;
    use std::fs;
    use tempfile::TempDir;

    fn compile(content: &str, source: &Path) -> Result<String, ModuleError> {
        let document = parse_document(content).unwrap();
        ModuleCompiler::new(Resolver::default(), MarkdownOptions::all()).compile(&document, source)
    }

    #[test]
    fn test_compile_rewrites_esm_imports() {
        let temp = TempDir::new().unwrap();
        let root = normalize_path(temp.path());
        fs::create_dir_all(root.join("app/routes")).unwrap();
        fs::write(root.join("app/routes/chart.jsx"), "").unwrap();
        let source = root.join("app/routes/report.mdx");

        let content = "import Chart from \"./chart\";\n\n# Report\n\n<Chart />\n";
        let module = compile(content, &source).unwrap();

        assert!(module.contains(&*root.join("app/routes/chart.jsx").to_string_lossy()));
        assert!(module.contains("MDXContent"));
        assert!(module.contains("export default MDXContent"));
    }

    #[test]
    fn test_compile_components_export_instantiated() {
        let temp = TempDir::new().unwrap();
        let source = normalize_path(temp.path()).join("page.mdx");

        let content = "export const components = { h1: \"h2\" };\n\n# Title\n";
        let module = compile(content, &source).unwrap();

        assert!(module.contains("React.createElement(MDXContent"));
        assert!(!module.contains("export default MDXContent"));
    }

    #[test]
    fn test_compile_duplicate_default_export_is_syntax_error() {
        let temp = TempDir::new().unwrap();
        let source = normalize_path(temp.path()).join("page.mdx");

        let content = "export default function Layout() {}\n\n# Title\n";
        let err = compile(content, &source).unwrap_err();
        assert!(matches!(err, ModuleError::Compile(CompileError::Syntax(_))));
    }

    #[test]
    fn test_compile_missing_import_is_resolution_error() {
        let temp = TempDir::new().unwrap();
        let source = normalize_path(temp.path()).join("page.mdx");

        let content = "import Missing from \"./missing\";\n\n<Missing />\n";
        let err = compile(content, &source).unwrap_err();
        assert!(matches!(err, ModuleError::Resolution(_)));
    }

    #[test]
    fn test_metadata_block_never_rendered() {
        let temp = TempDir::new().unwrap();
        let source = normalize_path(temp.path()).join("page.mdx");

        for content in ["---\n\ntitle: Hi\n---\n# Hello\n", "---\n---\n# Hello\n"] {
            let module = compile(content, &source).unwrap();
            assert!(!module.contains("_components.hr"), "{module}");
            assert!(!module.contains("title: Hi"), "{module}");
            assert!(module.contains("<_components.h1>{\"Hello\"}</_components.h1>"));
        }
    }

    #[test]
    fn test_metadata_export_key_not_hoisted() {
        let temp = TempDir::new().unwrap();
        let source = normalize_path(temp.path()).join("page.mdx");

        let module = compile("---\nexport const x: 1\n---\n# Hello\n", &source).unwrap();
        assert!(!module.contains("export const x"));
    }
}
