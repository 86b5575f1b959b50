//! Error types for the todo domain.
//!
//! # Design
//! Three failure families reach callers: the input was rejected before any
//! state was touched (`ValidationError`), the addressed todo does not exist
//! (`TodoError::NotFound`), or persistence failed (`StoreError`). Store
//! failures are never retried or handled here; they travel to whatever
//! boundary turns them into an opaque server error.

use thiserror::Error;

use crate::types::{Rank, TodoId};

/// Rejected todo text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("value is required")]
    MissingValue,

    #[error("value must be at least {min} characters long")]
    ValueTooShort { min: usize },

    #[error("value must be at most {max} characters long (got {actual})")]
    ValueTooLong { max: usize, actual: usize },
}

/// Failures raised by a `TodoStore` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A save addressed a record that is no longer stored, typically
    /// because a concurrent delete won the race.
    #[error("todo {0} is no longer stored")]
    Missing(TodoId),

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Errors returned by `TodoService` operations.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("todo {0} does not exist")]
    NotFound(TodoId),

    /// The highest rank in use has no successor.
    #[error("no rank left above {0}")]
    RankExhausted(Rank),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type TodoResult<T> = Result<T, TodoError>;
