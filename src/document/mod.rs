//! Hierarchical document addressing and shallow merge
//!
//! Documents live at alternating collection/document paths, e.g.
//! `experience/session/chapters/chapter-1`. A document body is a JSON object.

mod merge;
mod path;

pub use merge::{shallow_merge, shallow_merged};
pub use path::{DocPath, PathError};

/// A stored document body: a JSON object keyed by field name
pub type Document = serde_json::Map<String, serde_json::Value>;
