//! Ledger module - valuation, transaction log, category events and the document store seam.

mod ledger_event;
mod ledger_model;
mod ledger_service;
mod ledger_traits;
mod memory_store;

pub use ledger_event::LedgerEvent;
pub use ledger_model::{AppliedDelta, LedgerState, Transaction};
pub use ledger_service::{update_ledger, LedgerService};
pub use ledger_traits::{DocumentMutation, DocumentStore, LedgerServiceTrait};
pub use memory_store::InMemoryDocumentStore;
