//! Quiz submission and state query handlers
//!
//! `QuizService` is the single entry point for quiz operations. Transports
//! decode requests into [`ServerPayload`]s and call it; it validates, resolves
//! the chapter record path and talks to the injected [`DocumentStore`].

use super::address::{chapters_collection, resolve};
use super::identity::{non_empty, Identity, IdentityTuple};
use super::merge::{merge_submission, quiz_map, quiz_state};
use super::model::{QuizId, QuizState, QuizSubmission};
use super::payload::{ServerPayload, StateQuery};
use crate::document::Document;
use crate::storage::{DocumentStore, SetOptions, StorageError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by quiz operations
///
/// Absence of a record or of a quiz within a record is not an error; see
/// [`StateLookup`].
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Missing parameters: {}", .0.join(", "))]
    MissingParameters(Vec<&'static str>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for quiz operations
pub type QuizResult<T> = Result<T, QuizError>;

/// Acknowledgement of a stored submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub success: bool,
}

/// Outcome of a quiz state lookup
#[derive(Debug, Clone, PartialEq)]
pub enum StateLookup {
    /// No chapter record exists at the resolved path
    NoRecord,
    /// The record exists but holds no state for the quiz
    NoQuiz,
    Found(QuizState),
}

impl StateLookup {
    pub fn state(&self) -> Option<&QuizState> {
        match self {
            Self::Found(state) => Some(state),
            _ => None,
        }
    }

    pub fn into_state(self) -> Option<QuizState> {
        match self {
            Self::Found(state) => Some(state),
            _ => None,
        }
    }
}

/// Quiz operations over an injected document store
#[derive(Clone)]
pub struct QuizService {
    store: Arc<dyn DocumentStore>,
}

impl QuizService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // --- Write ---

    /// Fold a quiz submission into its chapter record.
    ///
    /// One read and one write. The read-merge-write is not atomic: two
    /// concurrent submissions to the same chapter may each start from the
    /// same snapshot, and the later write then drops the earlier quiz entry.
    pub async fn submit(&self, payload: ServerPayload<Document>) -> QuizResult<Ack> {
        let (tuple, submission) = validate_submission(payload)?;
        let path = resolve(&tuple);
        let quiz_id = submission.id().clone();
        debug!(
            %path,
            %quiz_id,
            authenticated = tuple.identity.is_authenticated(),
            fields = submission.fields().len(),
            "merging quiz submission"
        );

        let record = self.store.get(&path).await?.unwrap_or_default();
        let updated = merge_submission(record, submission);
        self.store.set(&path, updated, SetOptions::merge()).await?;

        info!(%path, %quiz_id, "quiz answer stored");
        Ok(Ack { success: true })
    }

    // --- Reads ---

    /// Look up one quiz's state for the identity in the payload.
    ///
    /// The identity-level `chapterId` addresses the record; the nested
    /// `data.chapterId` is only checked for presence.
    pub async fn get_state(&self, payload: ServerPayload<StateQuery>) -> QuizResult<StateLookup> {
        let (tuple, quiz_id) = validate_query(payload)?;
        self.quiz_state(&tuple, &quiz_id).await
    }

    /// Look up one quiz's state in an already resolved chapter
    pub async fn quiz_state(&self, tuple: &IdentityTuple, quiz_id: &QuizId) -> QuizResult<StateLookup> {
        let lookup = match self.chapter_record(tuple).await? {
            None => StateLookup::NoRecord,
            Some(record) => match quiz_state(&record, quiz_id.as_str()) {
                Some(state) => StateLookup::Found(state),
                None => StateLookup::NoQuiz,
            },
        };
        debug!(%quiz_id, found = lookup.state().is_some(), "quiz state lookup");
        Ok(lookup)
    }

    /// Load the whole chapter record
    pub async fn chapter_record(&self, tuple: &IdentityTuple) -> QuizResult<Option<Document>> {
        Ok(self.store.get(&resolve(tuple)).await?)
    }

    /// Ids of the quizzes stored in a chapter record
    pub async fn quiz_ids(&self, tuple: &IdentityTuple) -> QuizResult<Vec<QuizId>> {
        let record = self.chapter_record(tuple).await?.unwrap_or_default();
        Ok(quiz_map(&record).keys().map(|k| QuizId::from(k.as_str())).collect())
    }

    /// Ids of every chapter stored for one identity
    pub async fn chapters(&self, experience_id: &str, identity: &Identity) -> QuizResult<Vec<String>> {
        let paths = self.store.list(&chapters_collection(experience_id, identity)).await?;
        Ok(paths.iter().filter_map(|p| p.id()).map(str::to_string).collect())
    }
}

/// Presence checks for a submission; no store access happens before these pass
fn validate_submission(payload: ServerPayload<Document>) -> QuizResult<(IdentityTuple, QuizSubmission)> {
    let mut missing = Vec::new();

    let identity = Identity::from_parts(payload.user_id.as_deref(), payload.session_id.as_deref());
    if identity.is_none() {
        missing.push("sessionId");
    }
    let chapter_id = non_empty(payload.chapter_id.as_deref());
    if chapter_id.is_none() {
        missing.push("chapterId");
    }
    let experience_id = non_empty(payload.experience_id.as_deref());
    if experience_id.is_none() {
        missing.push("experienceId");
    }
    let submission = payload.data.and_then(QuizSubmission::from_document);
    if submission.is_none() {
        missing.push("data.id");
    }

    match (identity, experience_id, chapter_id, submission) {
        (Some(identity), Some(experience_id), Some(chapter_id), Some(submission)) => {
            Ok((IdentityTuple::new(experience_id, identity, chapter_id), submission))
        }
        _ => Err(QuizError::MissingParameters(missing)),
    }
}

/// Presence checks for a state query
fn validate_query(payload: ServerPayload<StateQuery>) -> QuizResult<(IdentityTuple, QuizId)> {
    let mut missing = Vec::new();

    let session_id = non_empty(payload.session_id.as_deref());
    if session_id.is_none() {
        missing.push("sessionId");
    }
    let experience_id = non_empty(payload.experience_id.as_deref());
    if experience_id.is_none() {
        missing.push("experienceId");
    }
    let query = payload.data.as_ref();
    let query_chapter = non_empty(query.and_then(|q| q.chapter_id.as_deref()));
    if query_chapter.is_none() {
        missing.push("data.chapterId");
    }
    let quiz_id = non_empty(query.and_then(|q| q.quiz_id.as_deref()));
    if quiz_id.is_none() {
        missing.push("data.quizId");
    }
    let chapter_id = non_empty(payload.chapter_id.as_deref());
    if chapter_id.is_none() {
        missing.push("chapterId");
    }

    match (session_id, experience_id, chapter_id, query_chapter, quiz_id) {
        (Some(session_id), Some(experience_id), Some(chapter_id), Some(query_chapter), Some(quiz_id)) => {
            if query_chapter != chapter_id {
                warn!(chapter_id, query_chapter, "query chapterId differs from payload chapterId; addressing by payload chapterId");
            }
            let identity = Identity::from_parts(payload.user_id.as_deref(), Some(session_id))
                .unwrap_or_else(|| Identity::anonymous(session_id));
            Ok((IdentityTuple::new(experience_id, identity, chapter_id), QuizId::from(quiz_id)))
        }
        _ => Err(QuizError::MissingParameters(missing)),
    }
}
