//! Market module - trading window and hour-bucket arithmetic.

mod calendar;

pub use calendar::MarketCalendar;
