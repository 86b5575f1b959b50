//! Rank assignment and swap-based reordering.
//!
//! # Design
//! Ranks are plain integers kept unique by two rules:
//!
//! - A new todo takes one more than the current highest rank, or
//!   [`FIRST_RANK`] when the store is empty. It therefore always lands at
//!   the front of the list.
//! - Moving a todo to rank `r` swaps it with whichever todo holds `r`
//!   exactly. Nothing between the old and new position shifts.
//!
//! Only the single exact-rank occupant is checked. If `r` is free the
//! todo simply claims it. Deletions leave gaps that are never compacted.
//!
//! Nothing here caches ranks: every call re-reads the store. Reads and the
//! sibling write are separate suspend points, so two reorders running at
//! the same time can interleave and leave a duplicate behind. Callers that
//! need stronger guarantees serialize writes around these calls (see
//! `WriteMode::Serialized`).

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{TodoError, TodoResult};
use crate::store::TodoStore;
use crate::types::{Rank, Todo, TodoId};

/// Rank given to the first todo of an empty list.
pub const FIRST_RANK: Rank = 1;

/// Effect of a reorder on the rank set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reorder {
    /// The target already held the requested rank.
    Unchanged,
    /// The requested rank was free and the target took it.
    Claimed { from: Rank, to: Rank },
    /// The target traded ranks with `with`.
    Swapped { from: Rank, to: Rank, with: TodoId },
}

/// Rank that follows `top`, the highest rank currently stored.
pub fn rank_after(top: Option<Rank>) -> TodoResult<Rank> {
    match top {
        None => Ok(FIRST_RANK),
        Some(top) => top.checked_add(1).ok_or(TodoError::RankExhausted(top)),
    }
}

/// Decides how `target` moves to `new_order` given the todo currently
/// found at that rank.
pub fn plan_reorder(target: &Todo, occupant: Option<&Todo>, new_order: Rank) -> Reorder {
    let from = target.order;
    if from == new_order {
        return Reorder::Unchanged;
    }
    match occupant {
        Some(other) if other.id != target.id => Reorder::Swapped {
            from,
            to: new_order,
            with: other.id,
        },
        _ => Reorder::Claimed {
            from,
            to: new_order,
        },
    }
}

/// Rank for a todo about to be created.
pub async fn assign_creation_rank(store: &dyn TodoStore) -> TodoResult<Rank> {
    let top = store.find_top_ranked().await?.map(|todo| todo.order);
    let rank = rank_after(top)?;
    debug!(?top, rank, "assigned creation rank");
    Ok(rank)
}

/// Moves `target` to `new_order`.
///
/// When another todo holds `new_order`, it receives the target's old rank
/// and is saved immediately with `updated_at = now`. The target itself is
/// only changed in memory: the caller saves it, usually together with
/// other field changes.
///
/// Moving a todo to the rank it already holds touches nothing.
pub async fn reorder(
    store: &dyn TodoStore,
    target: &mut Todo,
    new_order: Rank,
    now: DateTime<Utc>,
) -> TodoResult<Reorder> {
    if target.order == new_order {
        return Ok(Reorder::Unchanged);
    }

    let occupant = store.find_by_rank(new_order).await?;
    let plan = plan_reorder(target, occupant.as_ref(), new_order);

    if let (Reorder::Swapped { from, .. }, Some(mut sibling)) = (plan, occupant) {
        sibling.order = from;
        sibling.updated_at = now;
        store.save(&sibling).await?;
    }
    target.order = new_order;

    debug!(id = %target.id, ?plan, "reordered todo");
    Ok(plan)
}
