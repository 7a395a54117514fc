//! Quizstate: quiz-progress storage for multi-chapter experiences
//!
//! Records what a user or anonymous session answered in each quiz of a
//! chapter, and hands it back on request.
//!
//! # Core Concepts
//!
//! - **Chapter records**: one document per (experience, identity, chapter),
//!   stored at `<experienceId>/<userId | sessionId>/chapters/<chapterId>`
//! - **Quiz state**: per-quiz objects kept under the record's `quiz` field
//! - **Submissions**: partial quiz states shallow-merged into the stored state
//!   without disturbing sibling quizzes or other record fields
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quizstate::{MemoryStore, QuizService};
//!
//! let service = QuizService::new(Arc::new(MemoryStore::new()));
//! // Service is ready for submissions and queries
//! ```

pub mod config;
pub mod document;
pub mod http;
pub mod quiz;
pub mod storage;

pub use config::{Config, CorsPolicy, Database};
pub use document::{DocPath, Document};
pub use quiz::{
    Identity, IdentityTuple, QuizError, QuizId, QuizReport, QuizResult, QuizService, QuizState,
    QuizSubmission, ServerPayload, StateLookup, StateQuery,
};
pub use storage::{DocumentStore, MemoryStore, OpenStore, SetOptions, SqliteStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
