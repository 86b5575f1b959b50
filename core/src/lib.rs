//! Ordered todo list: domain model, ordering engine and service.
//!
//! # Overview
//! Todos carry an integer rank (`order`); the list is shown highest rank
//! first. New todos go to the front, and moving a todo swaps ranks with the
//! todo that currently holds the destination rank.
//!
//! # Design
//! - `store::TodoStore` is the only shared mutable resource. `MemoryStore`
//!   is the bundled backend.
//! - `ordering` holds the rank rules and never caches rank state.
//! - `service::TodoService` wires validation, ordering and the store into
//!   the four use cases. Store and clock are injected, never global.
//! - `validation::TodoValue` is the only way to get todo text into the
//!   service, so length checks happen before any store access.

pub mod clock;
pub mod error;
pub mod ordering;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{StoreError, TodoError, TodoResult, ValidationError};
pub use ordering::{Reorder, FIRST_RANK};
pub use service::{ParseWriteModeError, TodoService, WriteMode};
pub use store::{MemoryStore, TodoStore};
pub use types::{NewTodo, Rank, Todo, TodoId, TodoPatch};
pub use validation::{TodoValue, MAX_VALUE_CHARS, MIN_VALUE_CHARS};
