//! Storage backends for quiz state
//!
//! Chapter records are kept in a hierarchical document store behind the
//! `DocumentStore` trait. `SqliteStore` is the persistent implementation;
//! `MemoryStore` keeps documents in process.

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, OpenStore, SetOptions, StorageError, StorageResult};
