//! Todo use cases: create, list, update, delete.
//!
//! # Design
//! `TodoService` owns no todo state. It holds a store handle, a clock and an
//! optional write gate, all injected by the process entry point, and is
//! cheap to clone into every request.
//!
//! With `WriteMode::Interleaved` (the default) the store calls of concurrent
//! writes may interleave freely. `WriteMode::Serialized` routes every write
//! operation through one async mutex so each read-modify-write sequence runs
//! alone. Reads never wait on the gate.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{TodoError, TodoResult};
use crate::ordering;
use crate::store::TodoStore;
use crate::types::{NewTodo, Todo, TodoId, TodoPatch};
use crate::validation::TodoValue;

/// How concurrent write operations are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Interleaved,
    Serialized,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown write mode `{0}` (expected `interleaved` or `serialized`)")]
pub struct ParseWriteModeError(String);

impl FromStr for WriteMode {
    type Err = ParseWriteModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "interleaved" => Ok(Self::Interleaved),
            "serialized" | "serialised" => Ok(Self::Serialized),
            _ => Err(ParseWriteModeError(value.to_string())),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interleaved => f.write_str("interleaved"),
            Self::Serialized => f.write_str("serialized"),
        }
    }
}

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    clock: Arc<dyn Clock>,
    write_gate: Option<Arc<Mutex<()>>>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_gate: None,
        }
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_gate = match mode {
            WriteMode::Interleaved => None,
            WriteMode::Serialized => Some(Arc::new(Mutex::new(()))),
        };
        self
    }

    pub fn write_mode(&self) -> WriteMode {
        if self.write_gate.is_some() {
            WriteMode::Serialized
        } else {
            WriteMode::Interleaved
        }
    }

    async fn lock_writes(&self) -> Option<OwnedMutexGuard<()>> {
        match &self.write_gate {
            Some(gate) => Some(Arc::clone(gate).lock_owned().await),
            None => None,
        }
    }

    /// Creates an open todo ranked above every existing one.
    pub async fn create(&self, value: TodoValue) -> TodoResult<Todo> {
        let _guard = self.lock_writes().await;

        let order = ordering::assign_creation_rank(self.store.as_ref()).await?;
        let todo = self
            .store
            .create(NewTodo {
                value: value.into_inner(),
                order,
                created_at: self.clock.now(),
            })
            .await?;

        info!(id = %todo.id, order = todo.order, "created todo");
        Ok(todo)
    }

    /// Every todo, highest rank first.
    pub async fn list(&self) -> TodoResult<Vec<Todo>> {
        Ok(self.store.find_all_by_rank_desc().await?)
    }

    /// The todo `id`, or `NotFound`.
    pub async fn get(&self, id: TodoId) -> TodoResult<Todo> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    /// Applies `patch` to the todo `id` and returns the saved record.
    ///
    /// A rank change swaps with the current holder of that rank, whose
    /// record is written right away. The target is written once, after all
    /// fields are applied. An empty patch writes nothing.
    pub async fn update(&self, id: TodoId, patch: TodoPatch) -> TodoResult<Todo> {
        let _guard = self.lock_writes().await;

        let mut todo = self.get(id).await?;
        if patch.is_empty() {
            debug!(%id, "empty patch, nothing to write");
            return Ok(todo);
        }

        let now = self.clock.now();
        if let Some(order) = patch.order {
            ordering::reorder(self.store.as_ref(), &mut todo, order, now).await?;
        }
        if let Some(done) = patch.done {
            todo.done_at = done.then_some(now);
        }
        if let Some(value) = patch.value {
            todo.value = value.into_inner();
        }
        todo.updated_at = now;

        self.store.save(&todo).await?;
        debug!(%id, order = todo.order, done = todo.is_done(), "updated todo");
        Ok(todo)
    }

    /// Removes the todo `id`. Other ranks are left as they are.
    pub async fn delete(&self, id: TodoId) -> TodoResult<()> {
        let _guard = self.lock_writes().await;

        let todo = self.get(id).await?;
        if !self.store.delete(todo.id).await? {
            return Err(TodoError::NotFound(id));
        }

        info!(%id, order = todo.order, "deleted todo");
        Ok(())
    }
}

impl fmt::Debug for TodoService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoService")
            .field("write_mode", &self.write_mode())
            .finish_non_exhaustive()
    }
}
