//! Route table model.
//!
//! The table is what the framework consumes: route id → definition. It is
//! built by [`scan_routes`], rewritten by [`merge_content_routes`], and
//! printed as JSON.
//!
//! ```json
//! {
//!   "root": { "id": "root", "file": "root.tsx", "path": "" },
//!   "routes/index": { "id": "routes/index", "file": "/abs/.cache/mdx-routes/app/routes/index.mdx.js", "parentId": "root", "index": true }
//! }
//! ```

mod merge;
mod scan;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use merge::{MergeReport, merge_content_routes};
pub use scan::scan_routes;

/// One route definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    /// Unique hierarchical key (`routes/blog/post`).
    pub id: String,
    /// Module file, relative to the app directory or absolute.
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// URL segment relative to the parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub index: bool,
}

/// Route id → route definition, in id order.
pub type RouteTable = BTreeMap<String, RouteEntry>;
