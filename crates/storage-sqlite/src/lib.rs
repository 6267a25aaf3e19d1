//! SQLite storage implementation for YouInc.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the [`DocumentStore`](youinc_core::ledger::DocumentStore) trait
//! defined in `youinc-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor that serializes read-modify-write cycles
//! - The ledger document repository
//!
//! ```text
//!   core (domain)
//!        │
//!        ▼
//!  storage-sqlite (this crate)
//!        │
//!        ▼
//!    SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod ledger;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use errors::{IntoCore, StorageError};
pub use ledger::LedgerDocumentRepository;

// Re-export from youinc-core for convenience
pub use youinc_core::errors::{DatabaseError, Error, Result};
