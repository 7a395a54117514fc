//! HTTP surface
//!
//! Routes:
//! - `POST /submitQuizAnswer`
//! - `POST /getQuizState`
//! - `GET /healthz`
//!
//! Every route goes through the CORS and request-logging layers.

mod handlers;
mod layers;

pub use handlers::{
    ErrorResponse, HealthResponse, MessageResponse, StateResponse, MSG_ANSWER_STORED,
    MSG_MISSING_QUERY_PARAMS, MSG_MISSING_SUBMIT_PARAMS, MSG_NO_QUIZ_FOR_ID, MSG_NO_STATE,
    MSG_QUERY_FAILED, MSG_STATE_FOUND, MSG_SUBMIT_FAILED,
};

use crate::config::CorsPolicy;
use crate::quiz::QuizService;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Build the application router over a quiz service
pub fn router(service: QuizService, cors: CorsPolicy) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/submitQuizAnswer", post(handlers::submit_quiz_answer))
        .route("/getQuizState", post(handlers::get_quiz_state))
        .layer(middleware::from_fn_with_state(Arc::new(cors), layers::cors))
        .layer(middleware::from_fn(layers::log_requests))
        .with_state(service)
}

/// Serve until Ctrl-C
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "quizstate listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => warn!(error = %err, "failed to listen for shutdown signal"),
    }
}
