//! Remote expense store backed by the cloud document API.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use spendlog_core::errors::{DatabaseError, Error, Result};
use spendlog_core::expenses::{Expense, ExpenseDraft, ExpenseId, ExpenseStore};

use crate::client::ConnectApiClient;

// ─────────────────────────────────────────────────────────────────────────────
// API Response Types (internal, for parsing cloud API responses)
// ─────────────────────────────────────────────────────────────────────────────

/// Wire representation of an expense document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiExpense {
    id: String,
    amount: Decimal,
    #[serde(default)]
    note: String,
    #[serde(default)]
    category: Option<String>,
    date: i64,
}

/// Write body for insert and replace calls; the key travels in the path.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiExpenseWrite {
    amount: Decimal,
    note: String,
    category: Option<String>,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct ApiExpensesResponse {
    #[serde(default)]
    expenses: Vec<ApiExpense>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiInsertResponse {
    id: String,
}

impl From<ApiExpense> for Expense {
    fn from(doc: ApiExpense) -> Self {
        Expense {
            id: ExpenseId::Document(doc.id),
            amount: doc.amount,
            note: doc.note,
            category: doc.category,
            date: doc.date,
        }
    }
}

impl From<ExpenseDraft> for ApiExpenseWrite {
    fn from(draft: ExpenseDraft) -> Self {
        ApiExpenseWrite {
            amount: draft.amount,
            note: draft.note,
            category: draft.category,
            date: draft.date,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Remote expense store over the `/expenses` document collection.
///
/// Documents are keyed by server-assigned opaque string ids. There is no push
/// channel: the default `subscribe` applies and callers observe new state by
/// refetching after each successful mutation. Two mutations issued
/// concurrently can race; the refetch of the later-completing call reflects
/// both, and the controller discards the superseded one.
pub struct RemoteExpenseStore {
    client: ConnectApiClient,
}

impl RemoteExpenseStore {
    pub fn new(client: ConnectApiClient) -> Self {
        Self { client }
    }

    fn document_path(id: &ExpenseId) -> Result<String> {
        match id {
            ExpenseId::Document(key) => Ok(format!("/expenses/{}", urlencoding::encode(key))),
            ExpenseId::Local(row) => Err(Error::Database(DatabaseError::Internal(format!(
                "Remote store cannot address local row id {row}"
            )))),
        }
    }
}

#[async_trait]
impl ExpenseStore for RemoteExpenseStore {
    async fn insert(&self, draft: ExpenseDraft) -> Result<ExpenseId> {
        let created: ApiInsertResponse = self
            .client
            .post("/expenses", &ApiExpenseWrite::from(draft))
            .await?;
        Ok(ExpenseId::Document(created.id))
    }

    async fn update(&self, id: &ExpenseId, draft: ExpenseDraft) -> Result<()> {
        let path = Self::document_path(id)?;
        self.client.put(&path, &ApiExpenseWrite::from(draft)).await
    }

    async fn delete(&self, id: &ExpenseId) -> Result<()> {
        let path = Self::document_path(id)?;
        self.client.delete(&path).await
    }

    async fn fetch_all(&self) -> Result<Vec<Expense>> {
        let response: ApiExpensesResponse = self.client.get("/expenses").await?;
        Ok(response.expenses.into_iter().map(Expense::from).collect())
    }
}
