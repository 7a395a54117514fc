//! Route handlers and response bodies

use crate::document::Document;
use crate::quiz::{QuizError, QuizService, QuizState, ServerPayload, StateLookup, StateQuery};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

pub const MSG_ANSWER_STORED: &str = "Answer submitted successfully";
pub const MSG_SUBMIT_FAILED: &str = "Failed to submit answer";
pub const MSG_MISSING_SUBMIT_PARAMS: &str = "Missing params";
pub const MSG_STATE_FOUND: &str = "Quiz state retrieved successfully";
pub const MSG_NO_STATE: &str = "No quiz state found";
pub const MSG_NO_QUIZ_FOR_ID: &str = "No quiz state found for this quiz ID";
pub const MSG_QUERY_FAILED: &str = "Failed to get quiz state";
pub const MSG_MISSING_QUERY_PARAMS: &str = "Missing sessionId, chapterId, quizId, or experienceId";

/// `{success, message}` body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Body of a quiz state query; `data` is `null` when nothing is stored
#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub success: bool,
    pub data: Option<QuizState>,
    pub message: &'static str,
}

/// `{error}` body for rejected queries
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Decode a request body into a payload.
///
/// Unreadable bodies (bad JSON, wrong content type) and bodies of the wrong
/// shape come back as `None`; each route answers those with its own
/// missing-parameters response.
fn decode_payload<T: DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> Option<ServerPayload<T>> {
    let Json(value) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable request body");
            return None;
        }
    };
    match serde_json::from_value(value) {
        Ok(payload) => Some(payload),
        Err(err) => {
            debug!(error = %err, "request body has the wrong shape");
            None
        }
    }
}

fn missing_submit_params() -> Response {
    (StatusCode::BAD_REQUEST, MSG_MISSING_SUBMIT_PARAMS).into_response()
}

fn missing_query_params() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: MSG_MISSING_QUERY_PARAMS,
        }),
    )
        .into_response()
}

pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

pub async fn submit_quiz_answer(
    State(service): State<QuizService>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(payload) = decode_payload::<Document>(body) else {
        return missing_submit_params();
    };
    match service.submit(payload).await {
        Ok(ack) => (
            StatusCode::OK,
            Json(MessageResponse {
                success: ack.success,
                message: MSG_ANSWER_STORED,
            }),
        )
            .into_response(),
        Err(QuizError::MissingParameters(missing)) => {
            debug!(?missing, "rejected quiz submission");
            missing_submit_params()
        }
        Err(QuizError::Storage(err)) => {
            error!(error = %err, "error submitting quiz answer");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    success: false,
                    message: MSG_SUBMIT_FAILED,
                }),
            )
                .into_response()
        }
    }
}

pub async fn get_quiz_state(
    State(service): State<QuizService>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(payload) = decode_payload::<StateQuery>(body) else {
        return missing_query_params();
    };
    match service.get_state(payload).await {
        Ok(lookup) => {
            let message = match &lookup {
                StateLookup::Found(_) => MSG_STATE_FOUND,
                StateLookup::NoRecord => MSG_NO_STATE,
                StateLookup::NoQuiz => MSG_NO_QUIZ_FOR_ID,
            };
            let body = StateResponse {
                success: true,
                data: lookup.into_state(),
                message,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(QuizError::MissingParameters(missing)) => {
            debug!(?missing, "rejected quiz state query");
            missing_query_params()
        }
        Err(QuizError::Storage(err)) => {
            error!(error = %err, "error getting quiz state");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    success: false,
                    message: MSG_QUERY_FAILED,
                }),
            )
                .into_response()
        }
    }
}
