use std::collections::HashMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use log::error;
use num_traits::Zero;
use rust_decimal::Decimal;

use super::aggregation_model::MonthWindow;
use crate::expenses::Expense;
use crate::utils::time_utils::{day_end_millis, day_of_millis, day_start_millis, YearMonth};

/// Inclusive window covering `ym` in `tz`.
///
/// The start is local midnight of day 1 and the end the last millisecond of
/// the final calendar day, in the same timezone used to truncate expense
/// dates at write time.
pub fn month_window(ym: YearMonth, tz: Tz) -> MonthWindow {
    MonthWindow {
        start_millis: day_start_millis(ym.first_day(), tz),
        end_millis: day_end_millis(ym.last_day(), tz),
    }
}

/// Window spanning `months_around` whole months on each side of `reference`,
/// used to precompute per-day totals for the calendar grid.
pub fn rolling_window(reference: YearMonth, months_around: u32, tz: Tz) -> MonthWindow {
    MonthWindow {
        start_millis: day_start_millis(reference.minus_months(months_around).first_day(), tz),
        end_millis: day_end_millis(reference.plus_months(months_around).last_day(), tz),
    }
}

/// Expenses whose date falls inside the month window, newest first.
///
/// Membership is boundary-inclusive. The sort is stable, so expenses on the
/// same day keep their input order.
pub fn filter_and_sort(all: &[Expense], ym: YearMonth, tz: Tz) -> Vec<Expense> {
    let window = month_window(ym, tz);
    let mut filtered: Vec<Expense> = all
        .iter()
        .filter(|expense| window.contains(expense.date))
        .cloned()
        .collect();
    filtered.sort_by(|a, b| b.date.cmp(&a.date));
    filtered
}

/// Arithmetic sum of the amounts; zero for an empty slice.
pub fn month_total(filtered: &[Expense]) -> Decimal {
    filtered
        .iter()
        .fold(Decimal::zero(), |total, expense| total + expense.amount)
}

/// Per-calendar-day totals over an arbitrary inclusive window.
///
/// Days with no expenses are absent from the map; consumers treat absence as
/// zero.
pub fn per_day_totals(
    all: &[Expense],
    window_start_millis: i64,
    window_end_millis: i64,
    tz: Tz,
) -> HashMap<NaiveDate, Decimal> {
    let mut totals: HashMap<NaiveDate, Decimal> = HashMap::new();

    for expense in all {
        if expense.date < window_start_millis || expense.date > window_end_millis {
            continue;
        }
        let Some(day) = day_of_millis(expense.date, tz) else {
            error!(
                "Skipping expense {} with out-of-range date {}",
                expense.id, expense.date
            );
            continue;
        };
        *totals.entry(day).or_insert(Decimal::zero()) += expense.amount;
    }

    totals
}
