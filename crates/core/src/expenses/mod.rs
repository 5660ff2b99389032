//! Expenses module - domain models and the store contract.

mod expenses_model;
mod expenses_traits;


pub use expenses_model::{Expense, ExpenseDraft, ExpenseId};
pub use expenses_traits::ExpenseStore;
