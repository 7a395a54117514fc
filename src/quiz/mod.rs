//! Quiz progress: addressing, merging and the service built on them

mod address;
mod identity;
mod merge;
mod model;
mod payload;
mod service;

pub use address::{chapters_collection, resolve, CHAPTERS_COLLECTION};
pub use identity::{Identity, IdentityTuple};
pub use merge::{merge_submission, quiz_map, quiz_state, QUIZ_FIELD};
pub use model::{
    OptionValue, QuestionType, QuizId, QuizOption, QuizQuestionAnswer, QuizReport, QuizState,
    QuizSubmission, QuizUserAnswer, QUIZ_ID_FIELD,
};
pub use payload::{ServerPayload, StateQuery};
pub use service::{Ack, QuizError, QuizResult, QuizService, StateLookup};
