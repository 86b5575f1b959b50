//! Item store contract and the in-memory backend.
//!
//! # Design
//! The store is a plain document collection: it mints ids, looks records
//! up by id or by exact rank, sorts by rank, and overwrites or removes
//! whole records. It knows nothing about rank uniqueness; that rule lives
//! in `ordering`. Every method is a suspend point, so concurrent callers
//! may interleave between any two calls.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::types::{NewTodo, Rank, Todo, TodoId};

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Persists a new record under a freshly minted id.
    async fn create(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StoreError>;

    /// All records, highest rank first.
    async fn find_all_by_rank_desc(&self) -> Result<Vec<Todo>, StoreError>;

    /// The record holding the highest rank, if any.
    async fn find_top_ranked(&self) -> Result<Option<Todo>, StoreError>;

    /// A record holding exactly `order`. When several do, the one stored
    /// first wins.
    async fn find_by_rank(&self, order: Rank) -> Result<Option<Todo>, StoreError>;

    /// Overwrites an existing record. Fails with `StoreError::Missing` if
    /// the id is no longer stored.
    async fn save(&self, todo: &Todo) -> Result<(), StoreError>;

    /// Removes a record. Returns `false` if nothing was stored under `id`.
    async fn delete(&self, id: TodoId) -> Result<bool, StoreError>;
}

#[derive(Debug)]
struct Entry {
    seq: u64,
    todo: Todo,
}

#[derive(Debug, Default)]
struct Collection {
    next_seq: u64,
    entries: HashMap<TodoId, Entry>,
}

impl Collection {
    /// Rank descending, ties broken by insertion order.
    fn sorted(&self) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by(|a, b| b.todo.order.cmp(&a.todo.order).then(a.seq.cmp(&b.seq)));
        entries
    }
}

/// Process-local store backed by a hash map behind an async lock.
///
/// Cloning shares the underlying collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn create(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut collection = self.inner.write().await;
        let mut id = TodoId::generate();
        while collection.entries.contains_key(&id) {
            id = TodoId::generate();
        }
        let todo = todo.into_todo(id);
        let seq = collection.next_seq;
        collection.next_seq += 1;
        collection.entries.insert(
            id,
            Entry {
                seq,
                todo: todo.clone(),
            },
        );
        Ok(todo)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        let collection = self.inner.read().await;
        Ok(collection.entries.get(&id).map(|entry| entry.todo.clone()))
    }

    async fn find_all_by_rank_desc(&self) -> Result<Vec<Todo>, StoreError> {
        let collection = self.inner.read().await;
        let todos = collection
            .sorted()
            .into_iter()
            .map(|entry| entry.todo.clone())
            .collect();
        Ok(todos)
    }

    async fn find_top_ranked(&self) -> Result<Option<Todo>, StoreError> {
        let collection = self.inner.read().await;
        let top = collection
            .entries
            .values()
            .max_by(|a, b| a.todo.order.cmp(&b.todo.order).then(b.seq.cmp(&a.seq)))
            .map(|entry| entry.todo.clone());
        Ok(top)
    }

    async fn find_by_rank(&self, order: Rank) -> Result<Option<Todo>, StoreError> {
        let collection = self.inner.read().await;
        Ok(collection
            .entries
            .values()
            .filter(|entry| entry.todo.order == order)
            .min_by_key(|entry| entry.seq)
            .map(|entry| entry.todo.clone()))
    }

    async fn save(&self, todo: &Todo) -> Result<(), StoreError> {
        let mut collection = self.inner.write().await;
        let entry = collection
            .entries
            .get_mut(&todo.id)
            .ok_or(StoreError::Missing(todo.id))?;
        entry.todo = todo.clone();
        Ok(())
    }

    async fn delete(&self, id: TodoId) -> Result<bool, StoreError> {
        let mut collection = self.inner.write().await;
        Ok(collection.entries.remove(&id).is_some())
    }
}
