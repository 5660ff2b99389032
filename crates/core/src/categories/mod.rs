//! Categories module - fixed label set and dialog input resolution.

mod categories_constants;
mod categories_resolver;

#[cfg(test)]
mod categories_resolver_tests;

pub use categories_constants::*;
pub use categories_resolver::{resolve_for_edit, resolve_for_save, CategorySelection};
