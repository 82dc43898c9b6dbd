//! Per-file pipeline failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::cache::CacheWriteError;
use crate::compiler::{CompileError, ModuleError, ResolveError};
use crate::content::ParseError;

/// Why one content file could not be compiled.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read `{}`: {}", .0.display(), .1)]
    Read(PathBuf, #[source] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Resolution(#[from] ResolveError),

    #[error(transparent)]
    CacheWrite(#[from] CacheWriteError),
}

impl From<ModuleError> for PipelineError {
    fn from(err: ModuleError) -> Self {
        match err {
            ModuleError::Compile(e) => Self::Compile(e),
            ModuleError::Resolution(e) => Self::Resolution(e),
        }
    }
}

impl PipelineError {
    /// Short stage name for status lines.
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Read(..) => "read",
            Self::Parse(_) => "parse",
            Self::Compile(_) => "compile",
            Self::Resolution(_) => "resolve",
            Self::CacheWrite(_) => "cache",
        }
    }
}
