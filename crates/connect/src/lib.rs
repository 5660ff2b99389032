//! Remote document-store backend for Spendlog.
//!
//! This crate provides the HTTP client for the Spendlog cloud API and a
//! store implementation over it. The cloud store keeps expenses as documents
//! with server-assigned string keys and offers no push channel: callers
//! observe new state by refetching after each successful mutation.

mod client;
mod expenses;

pub use client::{ConnectApiClient, DEFAULT_API_URL};
pub use expenses::RemoteExpenseStore;

// Re-export from spendlog-core for convenience
pub use spendlog_core::errors::{Error, Result};
