use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use log::{debug, error};
use tokio::sync::watch;

use spendlog_core::errors::{DatabaseError, Error, Result};
use spendlog_core::expenses::{Expense, ExpenseDraft, ExpenseId, ExpenseStore};

use super::model::{ExpenseDB, ExpenseRowDB};
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::expenses;

/// Embedded expense store backed by SQLite.
///
/// Every successful mutation reloads the table and publishes the full
/// collection on a watch channel, which backs the `subscribe` capability of
/// the store contract. Subscribers therefore observe the complete current
/// collection after each change, never a diff.
pub struct SqliteExpenseStore {
    pool: Arc<DbPool>,
    changes_tx: watch::Sender<Vec<Expense>>,
}

impl SqliteExpenseStore {
    /// Creates the store and seeds the change feed with the current table
    /// contents.
    pub fn new(pool: Arc<DbPool>) -> Result<Self> {
        let initial = Self::load_all(&pool)?;
        let (changes_tx, _) = watch::channel(initial);
        Ok(Self { pool, changes_tx })
    }

    fn load_all(pool: &Arc<DbPool>) -> Result<Vec<Expense>> {
        let mut conn = get_connection(pool)?;
        let rows = expenses::table
            .select(ExpenseDB::as_select())
            .load::<ExpenseDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    /// Reloads the table and notifies subscribers. Failures are logged, not
    /// surfaced: the mutation itself already succeeded.
    fn notify_changed(&self) {
        match Self::load_all(&self.pool) {
            Ok(all) => {
                self.changes_tx.send_replace(all);
            }
            Err(e) => error!("Failed to reload expenses after write: {e}"),
        }
    }

    fn local_id(id: &ExpenseId) -> Result<i64> {
        match id {
            ExpenseId::Local(value) => Ok(*value),
            ExpenseId::Document(key) => Err(Error::Database(DatabaseError::Internal(format!(
                "Embedded store cannot address document key '{key}'"
            )))),
        }
    }

    /// Removes every expense and notifies subscribers. Returns the number of
    /// deleted rows.
    pub async fn delete_all(&self) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let deleted = diesel::delete(expenses::table)
            .execute(&mut conn)
            .into_core()?;
        debug!("Cleared {deleted} expenses");
        self.notify_changed();
        Ok(deleted)
    }

    /// Expenses with `date` in the inclusive range, newest first.
    pub async fn fetch_between(&self, start_millis: i64, end_millis: i64) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = expenses::table
            .filter(expenses::date.ge(start_millis))
            .filter(expenses::date.le(end_millis))
            .order(expenses::date.desc())
            .select(ExpenseDB::as_select())
            .load::<ExpenseDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }
}

#[async_trait]
impl ExpenseStore for SqliteExpenseStore {
    async fn insert(&self, draft: ExpenseDraft) -> Result<ExpenseId> {
        let mut conn = get_connection(&self.pool)?;
        let inserted = diesel::insert_into(expenses::table)
            .values(&ExpenseRowDB::from(draft))
            .returning(ExpenseDB::as_returning())
            .get_result::<ExpenseDB>(&mut conn)
            .into_core()?;
        debug!("Inserted expense {}", inserted.id);
        self.notify_changed();
        Ok(ExpenseId::Local(inserted.id))
    }

    async fn update(&self, id: &ExpenseId, draft: ExpenseDraft) -> Result<()> {
        let key = Self::local_id(id)?;
        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::update(expenses::table.find(key))
            .set(ExpenseRowDB::from(draft))
            .execute(&mut conn)
            .into_core()?;
        if affected == 0 {
            return Err(Error::Database(DatabaseError::NotFound(format!(
                "Expense {key} not found"
            ))));
        }
        debug!("Updated expense {key}");
        self.notify_changed();
        Ok(())
    }

    async fn delete(&self, id: &ExpenseId) -> Result<()> {
        let key = Self::local_id(id)?;
        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::delete(expenses::table.find(key))
            .execute(&mut conn)
            .into_core()?;
        if affected == 0 {
            return Err(Error::Database(DatabaseError::NotFound(format!(
                "Expense {key} not found"
            ))));
        }
        debug!("Deleted expense {key}");
        self.notify_changed();
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Expense>> {
        Self::load_all(&self.pool)
    }

    fn subscribe(&self) -> Option<watch::Receiver<Vec<Expense>>> {
        Some(self.changes_tx.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn test_store() -> (SqliteExpenseStore, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("spendlog.db");
        let pool = create_pool(db_path.to_str().unwrap()).unwrap();
        run_migrations(&pool).unwrap();
        (SqliteExpenseStore::new(pool).unwrap(), dir)
    }

    fn draft(amount: rust_decimal::Decimal, date: i64) -> ExpenseDraft {
        ExpenseDraft {
            amount,
            note: "test".to_string(),
            category: Some("Food".to_string()),
            date,
        }
    }

    #[tokio::test]
    async fn test_insert_then_fetch_contains_record() {
        let (store, _dir) = test_store();

        let new_draft = draft(dec!(100.00), 1_000);
        let id = store.insert(new_draft.clone()).await.unwrap();

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], new_draft.into_expense(id));
    }

    #[tokio::test]
    async fn test_ids_are_assigned_and_distinct() {
        let (store, _dir) = test_store();

        let first = store.insert(draft(dec!(1), 1)).await.unwrap();
        let second = store.insert(draft(dec!(2), 2)).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_update_replaces_full_record() {
        let (store, _dir) = test_store();
        let id = store.insert(draft(dec!(10), 1_000)).await.unwrap();

        let replacement = ExpenseDraft {
            amount: dec!(20),
            note: String::new(),
            category: None,
            date: 2_000,
        };
        store.update(&id, replacement.clone()).await.unwrap();

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, dec!(20));
        assert_eq!(all[0].note, "");
        // A full replace clears the category instead of keeping the old one.
        assert_eq!(all[0].category, None);
        assert_eq!(all[0].date, 2_000);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let (store, _dir) = test_store();
        let err = store
            .update(&ExpenseId::Local(999), draft(dec!(1), 1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_then_fetch_removes_record() {
        let (store, _dir) = test_store();
        let keep = store.insert(draft(dec!(1), 1)).await.unwrap();
        let gone = store.insert(draft(dec!(2), 2)).await.unwrap();

        store.delete(&gone).await.unwrap();

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, keep);

        let err = store.delete(&gone).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_subscription_observes_every_change() {
        let (store, _dir) = test_store();
        let rx = store.subscribe().unwrap();
        assert!(rx.borrow().is_empty());

        let id = store.insert(draft(dec!(5), 1)).await.unwrap();
        assert_eq!(rx.borrow().len(), 1);

        store.delete(&id).await.unwrap();
        assert!(rx.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_between_is_inclusive_and_sorted() {
        let (store, _dir) = test_store();
        store.insert(draft(dec!(1), 100)).await.unwrap();
        store.insert(draft(dec!(2), 200)).await.unwrap();
        store.insert(draft(dec!(3), 300)).await.unwrap();

        let ranged = store.fetch_between(100, 200).await.unwrap();
        assert_eq!(ranged.len(), 2);
        assert_eq!(ranged[0].date, 200);
        assert_eq!(ranged[1].date, 100);
    }

    #[tokio::test]
    async fn test_delete_all_clears_the_table() {
        let (store, _dir) = test_store();
        store.insert(draft(dec!(1), 1)).await.unwrap();
        store.insert(draft(dec!(2), 2)).await.unwrap();

        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_document_key_is_rejected() {
        let (store, _dir) = test_store();
        let err = store
            .delete(&ExpenseId::Document("abc".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::Internal(_))
        ));
    }
}
