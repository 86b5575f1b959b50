//! Domain model for the ordered todo list.
//!
//! # Design
//! `Todo` is the only entity. Its `order` field is a signed rank: higher
//! ranks sort first, and no two stored todos are meant to share one. The
//! store mints ids, so a todo that has not been persisted yet is a
//! `NewTodo` and carries no id at all.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::TodoValue;

/// Display rank of a todo. Higher sorts first.
pub type Rank = i64;

/// Opaque, store-assigned identifier of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Mints a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TodoId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A persisted todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub value: String,
    pub order: Rank,
    /// `None` while the todo is open; the completion instant otherwise.
    pub done_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub const fn is_done(&self) -> bool {
        self.done_at.is_some()
    }
}

/// A todo that has been ranked but not yet handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub value: String,
    pub order: Rank,
    pub created_at: DateTime<Utc>,
}

impl NewTodo {
    /// Attaches the store-minted id, producing an open todo.
    pub fn into_todo(self, id: TodoId) -> Todo {
        Todo {
            id,
            value: self.value,
            order: self.order,
            done_at: None,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Partial update of a todo. Every field is independent; `None` means the
/// caller did not mention it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// Rank to swap into.
    pub order: Option<Rank>,
    /// `Some(true)` completes the todo, `Some(false)` reopens it.
    pub done: Option<bool>,
    pub value: Option<TodoValue>,
}

impl TodoPatch {
    pub const fn is_empty(&self) -> bool {
        self.order.is_none() && self.done.is_none() && self.value.is_none()
    }
}
