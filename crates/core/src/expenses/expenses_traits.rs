use async_trait::async_trait;
use tokio::sync::watch;

use super::expenses_model::{Expense, ExpenseDraft, ExpenseId};
use crate::Result;

/// Trait defining the contract for expense persistence backends.
///
/// A backend is selected at construction time and is opaque to callers beyond
/// this contract. All four required operations may suspend; implementations
/// must be shareable across tasks.
///
/// `subscribe` is an optional capability: a backend with a native change feed
/// (the embedded store) returns a receiver observing the full collection after
/// every table change, while a backend without one (the remote document store)
/// keeps the default and relies on callers refetching after each successful
/// mutation. Callers must be correct using only the four required operations,
/// treating `subscribe` purely as an optimization over refetch-after-write.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Persists a new record and returns the identifier the backend assigned.
    async fn insert(&self, draft: ExpenseDraft) -> Result<ExpenseId>;

    /// Replaces the full record at `id` (never a partial patch).
    ///
    /// Fails with `DatabaseError::NotFound` if the identifier no longer
    /// exists (deleted concurrently elsewhere).
    async fn update(&self, id: &ExpenseId, draft: ExpenseDraft) -> Result<()>;

    /// Removes the record at `id`.
    async fn delete(&self, id: &ExpenseId) -> Result<()>;

    /// Returns the full current collection, unordered.
    async fn fetch_all(&self) -> Result<Vec<Expense>>;

    /// Optional change feed delivering the full collection on every change.
    fn subscribe(&self) -> Option<watch::Receiver<Vec<Expense>>> {
        None
    }
}
