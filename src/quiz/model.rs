//! Quiz state data model
//!
//! Stored quiz state is an opaque JSON object merged field by field. The
//! typed report structures describe what the quiz client actually sends and
//! are used to summarize stored state.

use crate::document::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field of a quiz submission that names its quiz
pub const QUIZ_ID_FIELD: &str = "id";

/// Identifier of one quiz within a chapter
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizId(String);

impl QuizId {
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuizId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for QuizId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Text form of a scalar id: non-empty strings as-is, numbers in decimal
/// form. Anything else is no id.
pub(crate) fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// An incoming partial quiz state with a mandatory id
///
/// Consumed once by the merger; never stored as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSubmission {
    id: QuizId,
    fields: Document,
}

impl QuizSubmission {
    /// Wrap a submitted object, reading its quiz id from the `id` field.
    ///
    /// Numeric ids are accepted and used in their decimal form. Returns
    /// `None` when the id is missing, empty, or of another type.
    pub fn from_document(fields: Document) -> Option<Self> {
        let id = id_text(fields.get(QUIZ_ID_FIELD)?)?;
        Some(Self {
            id: QuizId(id),
            fields,
        })
    }

    pub fn id(&self) -> &QuizId {
        &self.id
    }

    pub fn fields(&self) -> &Document {
        &self.fields
    }

    pub fn into_fields(self) -> Document {
        self.fields
    }
}

/// Stored state of one quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizState(Document);

impl QuizState {
    pub fn from_document(document: Document) -> Self {
        Self(document)
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }

    /// Decode into the typed report the quiz client submits
    pub fn report(&self) -> Result<QuizReport, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }
}

/// Kind of question presented by the quiz client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Rate,
    SingleImage,
    SingleImageGrid,
    SingleList,
}

/// Option value: numeric for ratings, text otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Number(f64),
    Text(String),
}

/// One selectable option of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub key: String,
    pub value: OptionValue,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A single answer given by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizUserAnswer {
    pub selected_value: OptionValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<QuizOption>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    /// Row label for rate questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_question_text: Option<String>,
}

/// All answers given to one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionAnswer {
    pub question_id: String,
    pub question_type: QuestionType,
    pub user_answers: Vec<QuizUserAnswer>,
}

/// The quiz payload a client submits, and the shape of a complete stored state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizReport {
    pub id: String,
    #[serde(default)]
    pub answers: Vec<QuizQuestionAnswer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<u32>,
}

impl QuizReport {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// `(correct, total)` once both counts are known
    pub fn score(&self) -> Option<(u32, u32)> {
        Some((self.correct_answers?, self.total_questions?))
    }

    /// Number of questions with at least one answer
    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|a| !a.user_answers.is_empty()).count()
    }
}
