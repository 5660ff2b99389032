use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::expenses::Expense;
use crate::utils::time_utils::YearMonth;

/// Lifecycle of the controller's authoritative collection.
///
/// `Error` is reachable from `Loading` or `Mutating` and is recovered by the
/// caller retrying the triggering operation; the engine never retries on its
/// own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LedgerState {
    Uninitialized,
    Loading,
    Ready,
    Mutating,
    Error { message: String },
}

/// Derived snapshot published to the presentation layer.
///
/// Rebuilt from the authoritative collection on every refresh or month
/// navigation; a day absent from `per_day_totals` has a zero total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerView {
    pub state: LedgerState,
    pub visible_month: YearMonth,
    pub visible_month_expenses: Vec<Expense>,
    pub month_total: Decimal,
    pub per_day_totals: HashMap<NaiveDate, Decimal>,
}

impl LedgerView {
    /// View published before any collection has been observed.
    pub fn empty(state: LedgerState, visible_month: YearMonth) -> Self {
        LedgerView {
            state,
            visible_month,
            visible_month_expenses: Vec::new(),
            month_total: Decimal::ZERO,
            per_day_totals: HashMap::new(),
        }
    }
}
