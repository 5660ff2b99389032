//! Database models for expenses.

use std::str::FromStr;

use diesel::prelude::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use spendlog_core::expenses::{Expense, ExpenseDraft, ExpenseId};

/// Parses a stored amount into a Decimal, with a fallback for scientific
/// notation by parsing as f64 first.
fn parse_decimal_string_tolerant(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e_decimal) => match f64::from_str(value_str) {
            Ok(f_val) => match Decimal::from_f64(f_val) {
                Some(dec_val) => dec_val,
                None => {
                    log::error!(
                        "Failed to convert {} '{}' (parsed as f64: {}) to Decimal.",
                        field_name,
                        value_str,
                        f_val
                    );
                    Decimal::ZERO
                }
            },
            Err(e_f64) => {
                log::error!(
                    "Failed to parse {} '{}': as Decimal (err: {}), and as f64 (err: {}). Falling back to ZERO.",
                    field_name, value_str, e_decimal, e_f64
                );
                Decimal::ZERO
            }
        },
    }
}

/// Database model for a persisted expense row.
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExpenseDB {
    pub id: i64,
    pub amount: String,
    pub note: String,
    pub category: Option<String>,
    pub date: i64,
}

/// Insertable/changeset row for a draft; the id is assigned by SQLite.
#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(treat_none_as_null = true)]
pub struct ExpenseRowDB {
    pub amount: String,
    pub note: String,
    pub category: Option<String>,
    pub date: i64,
}

impl From<ExpenseDB> for Expense {
    fn from(db: ExpenseDB) -> Self {
        Expense {
            id: ExpenseId::Local(db.id),
            amount: parse_decimal_string_tolerant(&db.amount, "amount"),
            note: db.note,
            category: db.category,
            date: db.date,
        }
    }
}

impl From<ExpenseDraft> for ExpenseRowDB {
    fn from(draft: ExpenseDraft) -> Self {
        ExpenseRowDB {
            amount: draft.amount.to_string(),
            note: draft.note,
            category: draft.category,
            date: draft.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_round_trip_keeps_amount_exact() {
        let draft = ExpenseDraft {
            amount: dec!(1234.56),
            note: "lunch".to_string(),
            category: Some("Food".to_string()),
            date: 1_706_725_800_000,
        };
        let row = ExpenseRowDB::from(draft.clone());
        assert_eq!(row.amount, "1234.56");

        let read_back = Expense::from(ExpenseDB {
            id: 7,
            amount: row.amount,
            note: row.note,
            category: row.category,
            date: row.date,
        });
        assert_eq!(read_back.id, ExpenseId::Local(7));
        assert_eq!(read_back.amount, draft.amount);
        assert_eq!(read_back.category, draft.category);
    }

    #[test]
    fn test_tolerant_parse_handles_scientific_notation() {
        assert_eq!(
            parse_decimal_string_tolerant("1.5e2", "amount"),
            dec!(150)
        );
        assert_eq!(parse_decimal_string_tolerant("garbage", "amount"), Decimal::ZERO);
    }
}
