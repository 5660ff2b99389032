//! Aggregation module - pure calendar-scoped derivations over a collection.

mod aggregation_model;
mod aggregation_service;

#[cfg(test)]
mod aggregation_service_tests;

pub use aggregation_model::MonthWindow;
pub use aggregation_service::{
    filter_and_sort, month_total, month_window, per_day_totals, rolling_window,
};
