//! SQLite storage implementation for Spendlog.
//!
//! This crate provides the embedded backend using Diesel ORM with SQLite.
//! It implements the store trait defined in `spendlog-core` and contains:
//! - Database connection pooling and the process-wide shared pool
//! - Diesel migrations
//! - The expense repository with its reactive change feed
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. The `core` and `connect` crates are database-agnostic and work with
//! traits.
//!
//! ```text
//! core (domain)          connect (remote store)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementation
pub mod expenses;

// Re-export database utilities
pub use db::{create_pool, get_connection, get_db_path, run_migrations, shared_pool, DbConnection, DbPool};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from spendlog-core for convenience
pub use spendlog_core::errors::{DatabaseError, Error, Result};
