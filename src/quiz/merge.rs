//! Chapter record merge
//!
//! A chapter record keeps every quiz's state under its `quiz` field. The
//! store only merges top-level fields, so folding one submission into the
//! record has to rebuild the whole `quiz` map here: the submitted quiz is
//! shallow-merged with its previous state and every sibling entry is
//! carried over untouched.

use super::model::{QuizState, QuizSubmission};
use crate::document::{shallow_merge, shallow_merged, Document};
use serde_json::Value;

/// Record field holding the per-quiz state map
pub const QUIZ_FIELD: &str = "quiz";

/// The record's quiz map, or an empty map when absent or not an object
pub fn quiz_map(record: &Document) -> Document {
    match record.get(QUIZ_FIELD) {
        Some(Value::Object(quizzes)) => quizzes.clone(),
        _ => Document::new(),
    }
}

/// Fold a submission into a chapter record.
///
/// Returns the full record to write back. Fields the submission carries
/// overwrite the stored quiz state; fields it omits survive. Other quizzes
/// and other record fields are never dropped.
pub fn merge_submission(record: Document, submission: QuizSubmission) -> Document {
    let mut quizzes = quiz_map(&record);
    let quiz_id = submission.id().as_str().to_string();

    let mut state = match quizzes.remove(&quiz_id) {
        Some(Value::Object(previous)) => previous,
        _ => Document::new(),
    };
    shallow_merge(&mut state, submission.into_fields());
    quizzes.insert(quiz_id, Value::Object(state));

    let mut update = Document::new();
    update.insert(QUIZ_FIELD.to_string(), Value::Object(quizzes));
    shallow_merged(record, update)
}

/// Look up one quiz's state in a chapter record
pub fn quiz_state(record: &Document, quiz_id: &str) -> Option<QuizState> {
    match record.get(QUIZ_FIELD)?.get(quiz_id)? {
        Value::Object(state) => Some(QuizState::from_document(state.clone())),
        _ => None,
    }
}
