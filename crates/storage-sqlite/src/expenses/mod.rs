//! SQLite storage implementation for expenses.

mod model;
mod repository;

pub use model::{ExpenseDB, ExpenseRowDB};
pub use repository::SqliteExpenseStore;
