//! Content-addressed cache of compiled route modules.
//!
//! Layout mirrors the project tree under the cache root:
//!
//! ```text
//! .cache/mdx-routes/
//! └── app/routes/
//!     ├── index.mdx.js          # compiled module
//!     └── index.mdx-1a2b3c4d    # marker: module matches this content hash
//! ```
//!
//! A module is valid iff the marker for the current content hash exists.

mod hash;
mod store;

pub use hash::ContentHash;
pub use store::{CacheStore, CacheWriteError};

/// Default cache directory (relative to the project root).
pub const DEFAULT_CACHE_DIR: &str = ".cache/mdx-routes";
