//! Ledger module - the controller orchestrating store, aggregation, and the
//! published derived views.

mod ledger_model;
mod ledger_service;


pub use ledger_model::{LedgerState, LedgerView};
pub use ledger_service::LedgerController;
