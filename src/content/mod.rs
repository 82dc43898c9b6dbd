//! Content documents.
//!
//! A content file is a leading metadata block followed by an MDX body:
//!
//! ```text
//! ---
//! title: Hello
//! meta:
//!   description: A greeting
//! ---
//!
//! # Hello
//! ```
//!
//! [`parse_document`] splits the two and parses the metadata; the body is
//! handed to the module compiler untouched. [`ContentGlob`] decides which
//! files are content.

mod frontmatter;
mod pattern;

pub use frontmatter::{Metadata, ParseError, ParsedDocument, parse_document};
pub use pattern::ContentGlob;
