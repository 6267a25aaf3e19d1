//! SQLite storage implementation for ledger documents.

mod model;
mod repository;

pub use model::LedgerDocumentDB;
pub use repository::LedgerDocumentRepository;
