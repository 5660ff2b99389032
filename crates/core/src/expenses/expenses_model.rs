use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// Identifier assigned by a backing store on successful insert.
///
/// The embedded store assigns auto-increment row ids; the remote document
/// store assigns opaque string keys. A record that has not been persisted has
/// no identifier at all (see [`ExpenseDraft`]), so "no id yet" is not
/// representable here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpenseId {
    Local(i64),
    Document(String),
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseId::Local(id) => write!(f, "{id}"),
            ExpenseId::Document(key) => write!(f, "{key}"),
        }
    }
}

/// Domain model representing one recorded transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    /// Non-negative currency value; formatting is display-only.
    pub amount: Decimal,
    /// Free text; empty means "no note".
    pub note: String,
    /// `None` or blank means "uncategorized".
    pub category: Option<String>,
    /// Epoch milliseconds of the local midnight of the calendar day this
    /// expense belongs to.
    pub date: i64,
}

impl Expense {
    /// True when a non-blank category is set (drives the category affordance).
    pub fn has_category(&self) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }

    /// True when the note has visible content.
    pub fn has_note(&self) -> bool {
        !self.note.trim().is_empty()
    }
}

/// Input model for creating or replacing an expense.
///
/// Drafts are produced by the presentation layer from dialog input and carry
/// no identifier; a store assigns one on insert, and updates address an
/// existing identifier passed alongside the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub amount: Decimal,
    pub note: String,
    pub category: Option<String>,
    pub date: i64,
}

impl ExpenseDraft {
    /// Validates the draft before it is handed to a store.
    pub fn validate(&self) -> Result<()> {
        if self.amount < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Amount cannot be negative".to_string(),
            )
            .into());
        }
        Ok(())
    }

    /// The persisted record this draft becomes once a store assigns `id`.
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            amount: self.amount,
            note: self.note,
            category: self.category,
            date: self.date,
        }
    }
}
