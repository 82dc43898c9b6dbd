//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects beyond
//! `canonicalize` in [`normalize_path`].

pub mod fs;

pub use fs::{append_suffix, normalize_path, resolve_path, to_slash};
