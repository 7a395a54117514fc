//! End-to-end tests of the HTTP surface over a real listener

use async_trait::async_trait;
use quizstate::http;
use quizstate::{
    CorsPolicy, DocPath, Document, DocumentStore, MemoryStore, QuizService, SetOptions, StorageError,
    StorageResult,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Store whose every operation fails
struct UnavailableStore;

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn get(&self, _path: &DocPath) -> StorageResult<Option<Document>> {
        Err(StorageError::Unavailable("backend down".to_string()))
    }

    async fn set(&self, _path: &DocPath, _document: Document, _options: SetOptions) -> StorageResult<()> {
        Err(StorageError::Unavailable("backend down".to_string()))
    }

    async fn delete(&self, _path: &DocPath) -> StorageResult<bool> {
        Err(StorageError::Unavailable("backend down".to_string()))
    }

    async fn list(&self, _collection: &DocPath) -> StorageResult<Vec<DocPath>> {
        Err(StorageError::Unavailable("backend down".to_string()))
    }
}

async fn spawn_app(store: Arc<dyn DocumentStore>, cors: CorsPolicy) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = http::router(QuizService::new(store), cors);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_memory_app() -> String {
    spawn_app(Arc::new(MemoryStore::new()), CorsPolicy::Mirror).await
}

fn submission(quiz: Value) -> Value {
    json!({
        "experienceId": "exp-1",
        "sessionId": "session-1",
        "chapterId": "chapter-1",
        "userId": null,
        "data": quiz
    })
}

fn query(quiz_id: &str) -> Value {
    json!({
        "experienceId": "exp-1",
        "sessionId": "session-1",
        "chapterId": "chapter-1",
        "data": {"chapterId": "chapter-1", "quizId": quiz_id}
    })
}

async fn post(base: &str, route: &str, body: &Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}{}", base, route))
        .json(body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn submitted_answer_can_be_read_back() {
    let base = spawn_memory_app().await;

    let response = post(&base, "/submitQuizAnswer", &submission(json!({
        "id": "quiz-1",
        "answers": [{"questionId": "q1", "questionType": "rate", "userAnswers": []}],
        "totalQuestions": 3
    })))
    .await;
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "message": "Answer submitted successfully"}));

    let response = post(&base, "/getQuizState", &query("quiz-1")).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Quiz state retrieved successfully"));
    assert_eq!(body["data"]["id"], json!("quiz-1"));
    assert_eq!(body["data"]["totalQuestions"], json!(3));
}

#[tokio::test]
async fn sibling_quizzes_survive_over_http() {
    let base = spawn_memory_app().await;

    post(&base, "/submitQuizAnswer", &submission(json!({"id": "A", "x": 1, "z": 3}))).await;
    post(&base, "/submitQuizAnswer", &submission(json!({"id": "B", "y": 2}))).await;
    post(&base, "/submitQuizAnswer", &submission(json!({"id": "A", "x": 9}))).await;

    let a: Value = post(&base, "/getQuizState", &query("A")).await.json().await.unwrap();
    let b: Value = post(&base, "/getQuizState", &query("B")).await.json().await.unwrap();

    assert_eq!(a["data"], json!({"id": "A", "x": 9, "z": 3}));
    assert_eq!(b["data"], json!({"id": "B", "y": 2}));
}

#[tokio::test]
async fn submit_with_missing_params_is_plain_text_400() {
    let base = spawn_memory_app().await;
    let mut body = submission(json!({"id": "quiz-1"}));
    body.as_object_mut().unwrap().remove("chapterId");

    let response = post(&base, "/submitQuizAnswer", &body).await;

    assert_eq!(response.status(), 400);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "Missing params");
}

#[tokio::test]
async fn query_with_missing_params_is_json_400() {
    let base = spawn_memory_app().await;
    let mut body = query("quiz-1");
    body["data"].as_object_mut().unwrap().remove("quizId");

    let response = post(&base, "/getQuizState", &body).await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Missing sessionId, chapterId, quizId, or experienceId"}));
}

async fn post_raw(base: &str, route: &str, body: &str, content_type: Option<&str>) -> reqwest::Response {
    let mut request = reqwest::Client::new()
        .post(format!("{}{}", base, route))
        .body(body.to_string());
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }
    request.send().await.unwrap()
}

#[tokio::test]
async fn submit_with_malformed_body_is_plain_text_400() {
    let base = spawn_memory_app().await;
    let wrong_data = submission(json!("oops")).to_string();

    for (body, content_type) in [
        (wrong_data.as_str(), Some("application/json")),
        ("{not json", Some("application/json")),
        (wrong_data.as_str(), None),
    ] {
        let response = post_raw(&base, "/submitQuizAnswer", body, content_type).await;

        assert_eq!(response.status(), 400, "body {body:?} with {content_type:?}");
        assert_eq!(response.text().await.unwrap(), "Missing params");
    }
}

#[tokio::test]
async fn query_with_malformed_body_is_json_400() {
    let base = spawn_memory_app().await;
    let mut wrong_data = query("quiz-1");
    wrong_data["data"] = json!("oops");
    let wrong_data = wrong_data.to_string();

    for (body, content_type) in [
        (wrong_data.as_str(), Some("application/json")),
        ("{not json", Some("application/json")),
        (wrong_data.as_str(), None),
    ] {
        let response = post_raw(&base, "/getQuizState", body, content_type).await;

        assert_eq!(response.status(), 400, "body {body:?} with {content_type:?}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Missing sessionId, chapterId, quizId, or experienceId"}));
    }
}

#[tokio::test]
async fn numeric_ids_round_trip_in_decimal_form() {
    let base = spawn_memory_app().await;
    let mut body = submission(json!({"id": 7, "score": 2}));
    body["sessionId"] = json!(5);

    let response = post(&base, "/submitQuizAnswer", &body).await;
    assert_eq!(response.status(), 200);

    let mut lookup = query("7");
    lookup["sessionId"] = json!(5);
    lookup["data"]["quizId"] = json!(7);
    let response = post(&base, "/getQuizState", &lookup).await;
    assert_eq!(response.status(), 200);
    let found: Value = response.json().await.unwrap();
    assert_eq!(found["data"], json!({"id": 7, "score": 2}));

    let mut by_string = query("7");
    by_string["sessionId"] = json!("5");
    let found: Value = post(&base, "/getQuizState", &by_string).await.json().await.unwrap();
    assert_eq!(found["data"]["score"], json!(2));
}

#[tokio::test]
async fn query_without_record_returns_null_data() {
    let base = spawn_memory_app().await;

    let response = post(&base, "/getQuizState", &query("quiz-1")).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "data": null, "message": "No quiz state found"}));
}

#[tokio::test]
async fn query_for_unknown_quiz_returns_null_data() {
    let base = spawn_memory_app().await;
    post(&base, "/submitQuizAnswer", &submission(json!({"id": "A"}))).await;

    let body: Value = post(&base, "/getQuizState", &query("B")).await.json().await.unwrap();

    assert_eq!(
        body,
        json!({"success": true, "data": null, "message": "No quiz state found for this quiz ID"})
    );
}

#[tokio::test]
async fn user_and_session_records_are_separate() {
    let base = spawn_memory_app().await;
    let mut as_user = submission(json!({"id": "A", "owner": "user"}));
    as_user["userId"] = json!("user-1");
    post(&base, "/submitQuizAnswer", &as_user).await;

    let anonymous: Value = post(&base, "/getQuizState", &query("A")).await.json().await.unwrap();
    assert_eq!(anonymous["data"], Value::Null);

    let mut user_query = query("A");
    user_query["userId"] = json!("user-1");
    let user: Value = post(&base, "/getQuizState", &user_query).await.json().await.unwrap();
    assert_eq!(user["data"]["owner"], json!("user"));
}

#[tokio::test]
async fn storage_failures_return_generic_500() {
    let base = spawn_app(Arc::new(UnavailableStore), CorsPolicy::Mirror).await;

    let response = post(&base, "/submitQuizAnswer", &submission(json!({"id": "A"}))).await;
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": false, "message": "Failed to submit answer"}));

    let response = post(&base, "/getQuizState", &query("A")).await;
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": false, "message": "Failed to get quiz state"}));
}

#[tokio::test]
async fn cors_preflight_mirrors_origin() {
    let base = spawn_memory_app().await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/submitQuizAnswer", base))
        .header("Origin", "https://quiz.example")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 204);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "https://quiz.example");
    assert_eq!(headers["access-control-allow-headers"], "content-type");
    assert!(headers["access-control-allow-methods"].to_str().unwrap().contains("POST"));
}

#[tokio::test]
async fn cors_origin_list_rejects_unknown_origins() {
    let policy = CorsPolicy::from_origins(vec!["https://allowed.example".to_string()]);
    let base = spawn_app(Arc::new(MemoryStore::new()), policy).await;

    let allowed = reqwest::Client::new()
        .post(format!("{}/getQuizState", base))
        .header("Origin", "https://allowed.example")
        .json(&query("A"))
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.headers()["access-control-allow-origin"], "https://allowed.example");

    let denied = reqwest::Client::new()
        .post(format!("{}/getQuizState", base))
        .header("Origin", "https://other.example")
        .json(&query("A"))
        .send()
        .await
        .unwrap();
    assert_eq!(denied.status(), 200);
    assert!(!denied.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn healthz_reports_version() {
    let base = spawn_memory_app().await;

    let body: Value = reqwest::get(format!("{}/healthz", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["version"], json!(quizstate::VERSION));
}
