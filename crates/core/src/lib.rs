//! YouInc Core - Domain entities, services, and traits.
//!
//! This crate contains the valuation engine: the tax rule, the market
//! calendar, the ledger, hourly decay and candle reconstruction.
//! It is storage-agnostic; the `storage-sqlite` crate implements
//! [`ledger::DocumentStore`] on top of SQLite.

pub mod candles;
pub mod clock;
pub mod constants;
pub mod decay;
pub mod errors;
pub mod ledger;
pub mod market;
pub mod tax;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
