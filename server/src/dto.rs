//! Request and response bodies of the HTTP surface.

use serde::{Deserialize, Deserializer, Serialize};
use todo_core::{Rank, Todo, TodoPatch, TodoValue, ValidationError};

/// Body of `POST /api/todos`. `value` is optional here so a missing field
/// surfaces as a validation message instead of a bare parse error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub value: Option<String>,
}

impl CreateTodoRequest {
    pub fn into_value(self) -> Result<TodoValue, ValidationError> {
        TodoValue::parse_required(self.value)
    }
}

/// Body of `PATCH /api/todos/{id}`.
///
/// `done` distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`), which reopens the todo like `false` does. For `order`
/// and `value`, `null` is treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub order: Option<Rank>,
    #[serde(default, deserialize_with = "present")]
    pub done: Option<Option<bool>>,
    #[serde(default)]
    pub value: Option<String>,
}

impl UpdateTodoRequest {
    pub fn into_patch(self) -> Result<TodoPatch, ValidationError> {
        Ok(TodoPatch {
            order: self.order,
            done: self.done.map(|done| done.unwrap_or(false)),
            value: self.value.map(TodoValue::parse).transpose()?,
        })
    }
}

/// Wraps any key that appears in the body, `null` included, in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct TodoEnvelope {
    pub todo: Todo,
}

#[derive(Debug, Serialize)]
pub struct TodoListEnvelope {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// Serializes as `{}`.
#[derive(Debug, Default, Serialize)]
pub struct Empty {}
