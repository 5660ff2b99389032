use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::constants::ROLLING_WINDOW_MONTHS;
use crate::expenses::{Expense, ExpenseId};
use crate::utils::time_utils::{day_start_millis, truncate_to_day_millis, YearMonth};

const TZ: Tz = chrono_tz::Asia::Kolkata;

fn expense_on(id: i64, year: i32, month: u32, day: u32, amount: Decimal) -> Expense {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
    Expense {
        id: ExpenseId::Local(id),
        amount,
        note: String::new(),
        category: None,
        date: day_start_millis(date, TZ),
    }
}

#[test]
fn test_filter_matches_window_membership() {
    let jan = YearMonth::new(2024, 1);
    let window = month_window(jan, TZ);

    let all = vec![
        expense_on(1, 2023, 12, 31, dec!(10)),
        expense_on(2, 2024, 1, 1, dec!(20)),
        expense_on(3, 2024, 1, 31, dec!(30)),
        expense_on(4, 2024, 2, 1, dec!(40)),
    ];

    let filtered = filter_and_sort(&all, jan, TZ);
    for expense in &all {
        let in_window = window.contains(expense.date);
        let in_filtered = filtered.iter().any(|e| e.id == expense.id);
        assert_eq!(in_window, in_filtered, "expense {:?}", expense.id);
    }
    assert_eq!(filtered.len(), 2);
}

#[test]
fn test_filter_sorts_newest_first_with_stable_ties() {
    let jan = YearMonth::new(2024, 1);
    let all = vec![
        expense_on(1, 2024, 1, 5, dec!(1)),
        expense_on(2, 2024, 1, 20, dec!(2)),
        expense_on(3, 2024, 1, 5, dec!(3)),
        expense_on(4, 2024, 1, 20, dec!(4)),
    ];

    let filtered = filter_and_sort(&all, jan, TZ);
    let ids: Vec<_> = filtered
        .iter()
        .map(|e| match &e.id {
            ExpenseId::Local(id) => *id,
            ExpenseId::Document(_) => unreachable!(),
        })
        .collect();
    // Same-day entries keep their input order.
    assert_eq!(ids, vec![2, 4, 1, 3]);
}

#[test]
fn test_month_total_sums_filtered_amounts() {
    let jan = YearMonth::new(2024, 1);
    let all = vec![
        expense_on(1, 2024, 1, 10, dec!(100.00)),
        expense_on(2, 2024, 1, 15, dec!(50.50)),
        expense_on(3, 2024, 2, 1, dec!(999)),
    ];

    let filtered = filter_and_sort(&all, jan, TZ);
    assert_eq!(month_total(&filtered), dec!(150.50));
    assert_eq!(month_total(&[]), Decimal::ZERO);
}

#[test]
fn test_midnight_boundary_splits_months() {
    // 90 minutes apart across a month boundary: the instants truncate to
    // different calendar days and must land in different months.
    let late_jan = TZ
        .with_ymd_and_hms(2024, 1, 31, 23, 0, 0)
        .unwrap()
        .to_utc();
    let early_feb = TZ.with_ymd_and_hms(2024, 2, 1, 0, 30, 0).unwrap().to_utc();

    let jan_expense = Expense {
        id: ExpenseId::Local(1),
        amount: dec!(10),
        note: String::new(),
        category: None,
        date: truncate_to_day_millis(late_jan, TZ),
    };
    let feb_expense = Expense {
        id: ExpenseId::Local(2),
        amount: dec!(20),
        note: String::new(),
        category: None,
        date: truncate_to_day_millis(early_feb, TZ),
    };
    assert_ne!(jan_expense.date, feb_expense.date);

    let all = vec![jan_expense, feb_expense];
    let jan_filtered = filter_and_sort(&all, YearMonth::new(2024, 1), TZ);
    let feb_filtered = filter_and_sort(&all, YearMonth::new(2024, 2), TZ);
    assert_eq!(jan_filtered.len(), 1);
    assert_eq!(jan_filtered[0].id, ExpenseId::Local(1));
    assert_eq!(feb_filtered.len(), 1);
    assert_eq!(feb_filtered[0].id, ExpenseId::Local(2));
}

#[test]
fn test_per_day_totals_groups_by_day_with_absent_zeroes() {
    let window = rolling_window(YearMonth::new(2024, 1), ROLLING_WINDOW_MONTHS, TZ);
    let all = vec![
        expense_on(1, 2024, 1, 10, dec!(100.00)),
        expense_on(2, 2024, 1, 15, dec!(50.50)),
        expense_on(3, 2024, 1, 10, dec!(25.00)),
    ];

    let totals = per_day_totals(&all, window.start_millis, window.end_millis, TZ);
    assert_eq!(
        totals.get(&NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()),
        Some(&dec!(125.00))
    );
    assert_eq!(
        totals.get(&NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
        Some(&dec!(50.50))
    );
    // A day with no expenses is absent, not an explicit zero.
    assert!(!totals.contains_key(&NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()));
    assert_eq!(totals.len(), 2);
}

#[test]
fn test_per_day_totals_respects_window_bounds() {
    let reference = YearMonth::new(2024, 6);
    let window = rolling_window(reference, ROLLING_WINDOW_MONTHS, TZ);

    let inside_early = expense_on(1, 2023, 6, 1, dec!(1));
    let inside_late = expense_on(2, 2025, 6, 30, dec!(2));
    let outside_early = expense_on(3, 2023, 5, 31, dec!(4));
    let outside_late = expense_on(4, 2025, 7, 1, dec!(8));

    let all = vec![inside_early, inside_late, outside_early, outside_late];
    let totals = per_day_totals(&all, window.start_millis, window.end_millis, TZ);

    assert_eq!(totals.len(), 2);
    assert!(totals.contains_key(&NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()));
    assert!(totals.contains_key(&NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()));
}

#[test]
fn test_month_window_boundaries_are_inclusive() {
    let jan = YearMonth::new(2024, 1);
    let window = month_window(jan, TZ);

    let first_instant = day_start_millis(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), TZ);
    let feb_start = day_start_millis(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), TZ);

    assert_eq!(window.start_millis, first_instant);
    assert_eq!(window.end_millis, feb_start - 1);
    assert!(window.contains(window.start_millis));
    assert!(window.contains(window.end_millis));
    assert!(!window.contains(feb_start));
}
