//! HTTP surface of the ordered todo service.
//!
//! Routes live under `/api`:
//!
//! - `GET    /api`             greeting
//! - `GET    /api/todos`       all todos, highest rank first
//! - `POST   /api/todos`       create, 201 with `{ todo }`
//! - `PATCH  /api/todos/{id}`  reorder / complete / rename, 200 with `{}`
//! - `DELETE /api/todos/{id}`  delete, 200 with `{}`
//!
//! Handlers only translate between JSON and `TodoService`; ordering rules
//! live in `todo_core`.

pub mod config;
pub mod dto;
pub mod error;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use todo_core::{MemoryStore, SystemClock, TodoId, TodoPatch, TodoService, WriteMode};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    dto::{CreateTodoRequest, Empty, Message, TodoEnvelope, TodoListEnvelope, UpdateTodoRequest},
    error::ApiErrorResponse,
};

pub fn app(service: TodoService) -> Router {
    let api = Router::new()
        .route("/", get(greet))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", patch(update_todo).delete(delete_todo));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// A service over a fresh in-memory store and the wall clock.
pub fn in_memory_service(write_mode: WriteMode) -> TodoService {
    TodoService::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
        .with_write_mode(write_mode)
}

pub async fn run(listener: TcpListener, service: TodoService) -> Result<(), std::io::Error> {
    axum::serve(listener, app(service)).await
}

/// Ids that do not parse cannot name a stored todo.
fn parse_id(raw: &str) -> Result<TodoId, ApiErrorResponse> {
    raw.parse().map_err(|_| ApiErrorResponse::not_found())
}

/// Reads a PATCH body. An empty body is an empty patch.
fn parse_patch(body: &[u8]) -> Result<TodoPatch, ApiErrorResponse> {
    if body.is_empty() {
        return Ok(TodoPatch::default());
    }
    let Json(input) = Json::<UpdateTodoRequest>::from_bytes(body)?;
    Ok(input.into_patch()?)
}

async fn greet() -> Json<Message> {
    Json(Message { message: "Hi!" })
}

async fn list_todos(
    State(service): State<TodoService>,
) -> Result<Json<TodoListEnvelope>, ApiErrorResponse> {
    let todos = service.list().await?;
    Ok(Json(TodoListEnvelope { todos }))
}

async fn create_todo(
    State(service): State<TodoService>,
    input: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoEnvelope>), ApiErrorResponse> {
    let Json(input) = input?;
    let value = input.into_value()?;
    let todo = service.create(value).await?;
    Ok((StatusCode::CREATED, Json(TodoEnvelope { todo })))
}

async fn update_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Empty>, ApiErrorResponse> {
    let id = parse_id(&id)?;
    let patch = match parse_patch(&body) {
        Ok(patch) => patch,
        Err(rejected) => {
            // an unknown id wins over a bad body
            service.get(id).await?;
            return Err(rejected);
        }
    };
    service.update(id, patch).await?;
    Ok(Json(Empty {}))
}

async fn delete_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<Json<Empty>, ApiErrorResponse> {
    let id = parse_id(&id)?;
    service.delete(id).await?;
    Ok(Json(Empty {}))
}
