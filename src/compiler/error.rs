//! Module compiler error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The compiled module is not valid JavaScript/JSX.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("syntax error in compiled module:\n{0}")]
    Syntax(String),
}

/// An import specifier that points nowhere.
#[derive(Debug, Error)]
#[error("cannot resolve import `{}` from `{}`", .specifier, .basedir.display())]
pub struct ResolveError {
    pub specifier: String,
    pub basedir: PathBuf,
}

impl ResolveError {
    pub fn new(specifier: &str, basedir: &Path) -> Self {
        Self {
            specifier: specifier.to_string(),
            basedir: basedir.to_path_buf(),
        }
    }
}

/// Failure of either module compiler stage.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Resolution(#[from] ResolveError),
}
