use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use todo_core::{
    MemoryStore, NewTodo, Rank, StoreError, SystemClock, Todo, TodoId, TodoService, TodoStore,
    WriteMode,
};
use todo_server::app;
use tower::ServiceExt;

fn new_app() -> Router {
    app(todo_server::in_memory_service(WriteMode::Interleaved))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

/// Sends one request through a router whose state outlives the call.
async fn send(app: &Router, request: Request<String>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn create(app: &Router, value: &str) -> Value {
    let body = json!({ "value": value }).to_string();
    let resp = send(app, json_request("POST", "/api/todos", &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await["todo"].clone()
}

async fn list(app: &Router) -> Vec<Value> {
    let resp = send(app, empty_request("GET", "/api/todos")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["todos"].as_array().unwrap().clone()
}

// --- greeting ---

#[tokio::test]
async fn api_root_greets() {
    let resp = new_app().oneshot(empty_request("GET", "/api")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "message": "Hi!" }));
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    let resp = new_app()
        .oneshot(empty_request("GET", "/api/todos"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "todos": [] }));
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201_with_envelope() {
    let resp = new_app()
        .oneshot(json_request("POST", "/api/todos", r#"{"value":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    let todo = &body["todo"];
    assert_eq!(todo["value"], "Buy milk");
    assert_eq!(todo["order"], 1);
    assert!(todo["doneAt"].is_null());
    assert!(todo["id"].is_string());
    assert!(todo["createdAt"].is_string());
    assert!(todo["updatedAt"].is_string());
}

#[tokio::test]
async fn create_todo_missing_value_returns_400() {
    let resp = new_app()
        .oneshot(json_request("POST", "/api/todos", r#"{"title":"wrong key"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["errorMessage"], "value is required");
}

#[tokio::test]
async fn create_todo_rejects_out_of_bounds_values() {
    let app = new_app();
    let too_long = json!({ "value": "x".repeat(51) }).to_string();
    let too_many_emoji = json!({ "value": "🎉".repeat(26) }).to_string();
    for body in [
        r#"{"value":""}"#,
        too_long.as_str(),
        too_many_emoji.as_str(),
        r#"{"value":7}"#,
        "not json",
    ] {
        let resp = send(&app, json_request("POST", "/api/todos", body)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body}");
        assert!(body_json(resp).await["errorMessage"].is_string());
    }
    assert!(list(&app).await.is_empty(), "nothing may be stored");
}

#[tokio::test]
async fn create_todo_accepts_fifty_chars() {
    let app = new_app();
    let todo = create(&app, &"x".repeat(50)).await;
    assert_eq!(todo["value"].as_str().unwrap().len(), 50);
}

// --- update ---

#[tokio::test]
async fn update_todo_not_found() {
    let resp = new_app()
        .oneshot(json_request(
            "PATCH",
            "/api/todos/00000000-0000-0000-0000-000000000000",
            r#"{"done":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_json(resp).await["errorMessage"].is_string());
}

#[tokio::test]
async fn update_todo_malformed_id_is_not_found() {
    let resp = new_app()
        .oneshot(json_request("PATCH", "/api/todos/not-a-uuid", r#"{"done":true}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_todo_rejects_empty_value() {
    let app = new_app();
    let todo = create(&app, "keep me").await;
    let uri = format!("/api/todos/{}", todo["id"].as_str().unwrap());

    let resp = send(&app, json_request("PATCH", &uri, r#"{"value":""}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(list(&app).await[0]["value"], "keep me");
}

#[tokio::test]
async fn reorder_swaps_ranks_over_http() {
    let app = new_app();
    let a = create(&app, "a").await;
    let b = create(&app, "b").await;
    let c = create(&app, "c").await;

    // move a (rank 1) onto c (rank 3)
    let uri = format!("/api/todos/{}", a["id"].as_str().unwrap());
    let resp = send(&app, json_request("PATCH", &uri, r#"{"order":3}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({}));

    let todos = list(&app).await;
    let ids: Vec<&Value> = todos.iter().map(|t| &t["id"]).collect();
    assert_eq!(ids, [&a["id"], &b["id"], &c["id"]]);
    let orders: Vec<i64> = todos.iter().map(|t| t["order"].as_i64().unwrap()).collect();
    assert_eq!(orders, [3, 2, 1]);
}

#[tokio::test]
async fn done_null_reopens_a_todo() {
    let app = new_app();
    let todo = create(&app, "laundry").await;
    let uri = format!("/api/todos/{}", todo["id"].as_str().unwrap());

    send(&app, json_request("PATCH", &uri, r#"{"done":true}"#)).await;
    assert!(list(&app).await[0]["doneAt"].is_string());

    send(&app, json_request("PATCH", &uri, r#"{"done":null}"#)).await;
    assert!(list(&app).await[0]["doneAt"].is_null());
}

#[tokio::test]
async fn update_unknown_id_is_not_found_whatever_the_body() {
    let app = new_app();
    let uri = "/api/todos/00000000-0000-0000-0000-000000000000";

    for request in [
        empty_request("PATCH", uri),
        json_request("PATCH", uri, ""),
        json_request("PATCH", uri, "not json"),
        json_request("PATCH", uri, r#"{"value":""}"#),
        json_request("PATCH", uri, r#"{"order":"top"}"#),
    ] {
        let resp = send(&app, request).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn update_without_body_changes_nothing() {
    let app = new_app();
    let todo = create(&app, "untouched").await;
    let uri = format!("/api/todos/{}", todo["id"].as_str().unwrap());

    let resp = send(&app, empty_request("PATCH", &uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({}));
    assert_eq!(list(&app).await, [todo]);
}

#[tokio::test]
async fn update_known_id_with_bad_body_is_400() {
    let app = new_app();
    let todo = create(&app, "stays").await;
    let uri = format!("/api/todos/{}", todo["id"].as_str().unwrap());

    let resp = send(&app, json_request("PATCH", &uri, "not json")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["errorMessage"].is_string());
    assert_eq!(list(&app).await, [todo]);
}

// --- delete ---

#[tokio::test]
async fn delete_todo_not_found() {
    let resp = new_app()
        .oneshot(empty_request(
            "DELETE",
            "/api/todos/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- store failures ---

/// A store whose every call fails.
struct BrokenStore;

#[async_trait]
impl TodoStore for BrokenStore {
    async fn create(&self, _todo: NewTodo) -> Result<Todo, StoreError> {
        Err(StoreError::Backend("secret dsn".into()))
    }

    async fn find_by_id(&self, _id: TodoId) -> Result<Option<Todo>, StoreError> {
        Err(StoreError::Backend("secret dsn".into()))
    }

    async fn find_all_by_rank_desc(&self) -> Result<Vec<Todo>, StoreError> {
        Err(StoreError::Backend("secret dsn".into()))
    }

    async fn find_top_ranked(&self) -> Result<Option<Todo>, StoreError> {
        Err(StoreError::Backend("secret dsn".into()))
    }

    async fn find_by_rank(&self, _order: Rank) -> Result<Option<Todo>, StoreError> {
        Err(StoreError::Backend("secret dsn".into()))
    }

    async fn save(&self, _todo: &Todo) -> Result<(), StoreError> {
        Err(StoreError::Backend("secret dsn".into()))
    }

    async fn delete(&self, _id: TodoId) -> Result<bool, StoreError> {
        Err(StoreError::Backend("secret dsn".into()))
    }
}

#[tokio::test]
async fn store_failure_is_an_opaque_500() {
    let service = TodoService::new(Arc::new(BrokenStore), Arc::new(SystemClock));
    let resp = app(service)
        .oneshot(empty_request("GET", "/api/todos"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body, json!({ "errorMessage": "internal server error" }));
}

// --- full lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let store = MemoryStore::new();
    let service = TodoService::new(Arc::new(store.clone()), Arc::new(SystemClock))
        .with_write_mode(WriteMode::Serialized);
    let app = app(service);

    // create two; the later one lists first
    let x = create(&app, "x").await;
    let y = create(&app, "y").await;
    assert_eq!(x["order"], 1);
    assert_eq!(y["order"], 2);
    let todos = list(&app).await;
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0]["id"], y["id"]);
    assert_eq!(todos[1]["id"], x["id"]);

    // complete x and rename it in one request
    let x_uri = format!("/api/todos/{}", x["id"].as_str().unwrap());
    let resp = send(
        &app,
        json_request("PATCH", &x_uri, r#"{"done":true,"value":"x, done"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let todos = list(&app).await;
    assert_eq!(todos[1]["value"], "x, done");
    assert!(todos[1]["doneAt"].is_string());
    assert_eq!(todos[1]["order"], 1, "rank untouched");

    // delete y; x keeps its rank
    let y_uri = format!("/api/todos/{}", y["id"].as_str().unwrap());
    let resp = send(&app, empty_request("DELETE", &y_uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({}));
    let todos = list(&app).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["order"], 1);

    // deleting again is 404
    let resp = send(&app, empty_request("DELETE", &y_uri)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // ranks come from the current top, so y's old rank is handed out again
    let z = create(&app, "z").await;
    assert_eq!(z["order"], 2);
    assert_eq!(store.find_all_by_rank_desc().await.unwrap().len(), 2);
}
