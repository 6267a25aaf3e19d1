//! Tax module - delta categories and the progressive tax rule.

mod tax_model;
mod tax_rule;

pub use tax_model::{DeltaKind, TaxOutcome};
pub use tax_rule::{apply_tax, price_from_valuation, tax_multiplier};
